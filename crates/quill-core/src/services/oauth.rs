//! OAuth delegate: turns an external identity into a local author and a session.

use std::sync::Arc;

use crate::domain::Author;
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, AuthorRepository, ExternalIdentity, IdentityProvider, ProviderError};

use super::SessionService;

/// Outcome of a completed provider callback.
#[derive(Debug, Clone)]
pub struct OAuthLogin {
    pub author: Author,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Author lookup or creation failed: {0}")]
    Persistence(#[from] RepoError),

    #[error("Identity conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Token(#[from] AuthError),
}

pub struct OAuthDelegate {
    provider: Arc<dyn IdentityProvider>,
    authors: Arc<dyn AuthorRepository>,
    sessions: Arc<SessionService>,
}

impl OAuthDelegate {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        authors: Arc<dyn AuthorRepository>,
        sessions: Arc<SessionService>,
    ) -> Self {
        Self {
            provider,
            authors,
            sessions,
        }
    }

    pub fn authorization_url(&self) -> String {
        self.provider.authorization_url()
    }

    /// Finish the authorization-code flow: exchange, resolve, issue.
    pub async fn complete(&self, code: &str) -> Result<OAuthLogin, DelegateError> {
        let identity = self.provider.exchange(code).await?;
        let author = self.resolve(identity).await?;
        let token = self.sessions.issue(author.id, &author.email)?;

        tracing::info!(author_id = %author.id, "External sign-in completed");
        Ok(OAuthLogin { author, token })
    }

    /// Find the author for an external identity, creating one on first sign-in.
    ///
    /// An existing password account with the same email gets the external
    /// identity linked instead of a second record. Linking or creating by
    /// email requires the provider to have verified that email.
    pub async fn resolve(&self, identity: ExternalIdentity) -> Result<Author, DelegateError> {
        if let Some(author) = self.authors.find_by_google_id(&identity.external_id).await? {
            return Ok(author);
        }

        if !identity.email_verified {
            tracing::warn!(external_id = %identity.external_id, "External identity has an unverified email");
            return Err(ProviderError::Rejected("email address is not verified".to_string()).into());
        }

        if let Some(mut author) = self.authors.find_by_email(&identity.email).await? {
            author
                .link_external_identity(identity.external_id.clone())
                .map_err(|e| match e {
                    DomainError::Duplicate(msg) => DelegateError::Conflict(msg),
                    other => DelegateError::Conflict(other.to_string()),
                })?;
            if author.avatar.is_none() {
                author.avatar = identity.picture.clone();
            }
            tracing::info!(author_id = %author.id, "Linked external identity to existing author");
            return Ok(self.authors.update(author).await?);
        }

        let first_name = identity
            .given_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| local_part(&identity.email).to_string());
        let last_name = identity.family_name.clone().unwrap_or_default();

        let author = Author::with_external_identity(
            &identity.email,
            identity.external_id.clone(),
            first_name,
            last_name,
            identity.picture.clone(),
        );

        match self.authors.insert(author).await {
            Ok(created) => {
                tracing::info!(author_id = %created.id, "Created author from external identity");
                Ok(created)
            }
            // Lost a race against a concurrent callback for the same identity.
            Err(RepoError::Constraint(msg)) => self
                .authors
                .find_by_google_id(&identity.external_id)
                .await?
                .ok_or(DelegateError::Persistence(RepoError::Constraint(msg))),
            Err(e) => Err(e.into()),
        }
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
