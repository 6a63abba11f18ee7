//! Session tokens: signing plus the revocation set.

use std::sync::Arc;

use uuid::Uuid;

use crate::ports::{AuthError, RevocationStore, TokenClaims, TokenService};

/// Issues, verifies and revokes bearer tokens.
///
/// Revocation is tracked per token string, so logging out one device leaves
/// other tokens for the same author valid.
pub struct SessionService {
    tokens: Arc<dyn TokenService>,
    revocations: Arc<dyn RevocationStore>,
}

impl SessionService {
    pub fn new(tokens: Arc<dyn TokenService>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self {
            tokens,
            revocations,
        }
    }

    pub fn issue(&self, subject_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.tokens.issue(subject_id, email)
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.verify(token)
    }

    pub async fn revoke(&self, token: &str) {
        self.revocations.revoke(token).await;
        tracing::debug!("Session token revoked");
    }

    pub async fn is_revoked(&self, token: &str) -> bool {
        self.revocations.is_revoked(token).await
    }

    pub fn expiration_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }
}
