//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! persistence, token signing, password hashing, the revocation set,
//! the Google identity provider, outbound mail and upload storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory stores only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - JWT + Argon2 authentication and the revocation set
//! - `oauth` - Google sign-in via reqwest
//! - `mail` - SMTP delivery via lettre

pub mod database;
pub mod mail;
pub mod media;
pub mod redact;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "oauth")]
pub mod oauth;

// Re-exports - In-Memory
pub use database::{InMemoryAuthorRepository, InMemoryPostRepository};
pub use mail::LoggingMailer;
pub use media::{LocalMediaConfig, LocalMediaStore};
pub use redact::mask_email;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, InMemoryRevocationStore, JwtConfig, JwtTokenService};

#[cfg(feature = "mail")]
pub use mail::{SmtpConfig, SmtpMailer};

#[cfg(feature = "oauth")]
pub use oauth::{GoogleIdentityProvider, GoogleOAuthConfig};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresAuthorRepository, PostgresPostRepository};
