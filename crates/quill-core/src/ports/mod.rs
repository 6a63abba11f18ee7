//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod identity;
mod mail;
mod media;
mod repository;

pub use auth::{AuthError, PasswordService, RevocationStore, TokenClaims, TokenService};
pub use clock::{Clock, SystemClock};
pub use identity::{ExternalIdentity, IdentityProvider, ProviderError};
pub use mail::{EmailMessage, MailError, Mailer};
pub use media::{ImageFormat, MediaError, MediaStore};
pub use repository::{AuthorRepository, BaseRepository, PostRepository};
