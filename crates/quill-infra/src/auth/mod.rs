//! Authentication implementations.

mod jwt;
mod password;
mod revocation;

pub use jwt::{JwtConfig, JwtTokenService, SESSION_LIFETIME_HOURS};
pub use password::Argon2PasswordService;
pub use revocation::InMemoryRevocationStore;
