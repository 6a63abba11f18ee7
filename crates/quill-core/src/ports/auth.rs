//! Authentication ports: token signing, revocation and password hashing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject_id: Uuid,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Stateless signing and verification of session tokens.
pub trait TokenService: Send + Sync {
    /// Sign a token for the given subject.
    fn issue(&self, subject_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Check signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Set of token strings invalidated before their natural expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Add a token. Revoking an already revoked token is a no-op.
    async fn revoke(&self, token: &str);

    async fn is_revoked(&self, token: &str) -> bool;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    #[error("Token has been revoked")]
    Revoked,

    #[error("Token subject no longer exists")]
    UnknownSubject,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Credential store unavailable: {0}")]
    Backend(String),
}

impl AuthError {
    /// Whether the error is a rejection of the caller rather than a server fault.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AuthError::Hashing(_) | AuthError::Backend(_))
    }

    /// Short machine-friendly name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::Malformed(_) => "malformed",
            AuthError::SignatureInvalid => "signature_invalid",
            AuthError::Expired => "expired",
            AuthError::Revoked => "revoked",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Hashing(_) => "hashing",
            AuthError::Backend(_) => "backend",
        }
    }
}
