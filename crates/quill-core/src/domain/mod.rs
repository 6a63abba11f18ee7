//! Domain entities - the core business objects.

mod author;
mod comment;
mod page;
mod post;

pub use author::{Author, AuthorProfile, normalize_email};
pub use comment::Comment;
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest};
pub use post::{DEFAULT_READ_TIME_UNIT, Post, ReadTime};
