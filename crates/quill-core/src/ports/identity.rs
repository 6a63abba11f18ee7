//! External identity provider port (OAuth 2.0 authorization-code flow).

use async_trait::async_trait;

/// Identity asserted by a third-party provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Stable subject identifier at the provider.
    pub external_id: String,
    pub email: String,
    /// Whether the provider has verified ownership of `email`.
    pub email_verified: bool,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is redirected to in order to grant consent.
    fn authorization_url(&self) -> String;

    /// Trade an authorization code for the identity it was issued for.
    async fn exchange(&self, code: &str) -> Result<ExternalIdentity, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider rejected the grant: {0}")]
    Rejected(String),

    #[error("Provider response is missing {0}")]
    MissingClaim(&'static str),
}
