//! # Quill Shared
//!
//! Wire types shared between the API server and its clients.
//! Free of server dependencies so a Rust client can compile it as-is.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse, Paginated};
