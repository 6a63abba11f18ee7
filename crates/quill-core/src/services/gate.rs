//! Authentication gate applied in front of every protected operation.

use std::sync::Arc;

use crate::domain::AuthorProfile;
use crate::ports::{AuthError, AuthorRepository, TokenClaims};

use super::SessionService;

const BEARER_PREFIX: &str = "Bearer ";

/// An authenticated request context.
#[derive(Debug, Clone)]
pub struct Session {
    pub author: AuthorProfile,
    pub token: String,
    pub claims: TokenClaims,
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let token = authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Resolves a bearer token to the author it was issued for.
pub struct AuthGate {
    sessions: Arc<SessionService>,
    authors: Arc<dyn AuthorRepository>,
}

impl AuthGate {
    pub fn new(sessions: Arc<SessionService>, authors: Arc<dyn AuthorRepository>) -> Self {
        Self { sessions, authors }
    }

    /// Run the gate against a raw `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Session, AuthError> {
        let token = bearer_token(authorization)?;

        if self.sessions.is_revoked(token).await {
            return Err(AuthError::Revoked);
        }

        let claims = self.sessions.verify(token)?;

        let author = self
            .authors
            .find_by_id(claims.subject_id)
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?
            .ok_or(AuthError::UnknownSubject)?;

        tracing::debug!(author_id = %author.id, "Request authenticated");

        Ok(Session {
            author: author.profile(),
            token: token.to_string(),
            claims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_the_scheme() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwdw==")),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(bearer_token(Some("Bearer   ")), Err(AuthError::MissingToken)));
    }
}
