//! Google OAuth 2.0 identity provider over `reqwest`.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use quill_core::ports::{ExternalIdentity, IdentityProvider, ProviderError};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google client credentials and the callback registered for them.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl GoogleOAuthConfig {
    /// Read `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` and either
    /// `GOOGLE_CALLBACK_URL` or `BACKEND_HOST` + `GOOGLE_CALLBACK_PATH`.
    /// `None` unless the client credentials are both present.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;

        let redirect_url = std::env::var("GOOGLE_CALLBACK_URL").unwrap_or_else(|_| {
            let host = std::env::var("BACKEND_HOST")
                .unwrap_or_else(|_| "http://localhost:8080".to_string());
            let path = std::env::var("GOOGLE_CALLBACK_PATH")
                .unwrap_or_else(|_| "/api/v1/callback-google".to_string());
            format!("{}{}", host.trim_end_matches('/'), path)
        });

        Some(Self {
            client_id,
            client_secret,
            redirect_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Subset of the OpenID Connect userinfo document we consume.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl TryFrom<GoogleUserInfo> for ExternalIdentity {
    type Error = ProviderError;

    fn try_from(info: GoogleUserInfo) -> Result<Self, Self::Error> {
        let email = info
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(ProviderError::MissingClaim("email"))?;

        Ok(Self {
            external_id: info.sub,
            email,
            email_verified: info.email_verified,
            given_name: info.given_name,
            family_name: info.family_name,
            picture: info.picture,
        })
    }
}

pub struct GoogleIdentityProvider {
    config: GoogleOAuthConfig,
    consent_url: Url,
    client: reqwest::Client,
}

impl GoogleIdentityProvider {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, ProviderError> {
        let consent_url = Url::parse_with_params(
            AUTHORIZATION_ENDPOINT,
            &[
                ("client_id", config.client_id.as_str()),
                ("redirect_uri", config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid profile email"),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            config,
            consent_url,
            client: reqwest::Client::new(),
        })
    }

    async fn access_token(&self, code: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Google rejected the authorization code");
            return Err(ProviderError::Rejected(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self) -> String {
        self.consent_url.to_string()
    }

    async fn exchange(&self, code: &str) -> Result<ExternalIdentity, ProviderError> {
        let access_token = self.access_token(code).await?;

        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected(format!(
                "userinfo returned {}",
                response.status()
            )));
        }

        let info: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        info.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            redirect_url: "http://localhost:8080/api/v1/callback-google".to_string(),
        }
    }

    #[test]
    fn test_authorization_url_carries_client_and_callback() {
        let provider = GoogleIdentityProvider::new(config()).unwrap();

        let url = Url::parse(&provider.authorization_url()).unwrap();
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert!(params.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(params.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:8080/api/v1/callback-google".to_string()
        )));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        assert!(!provider.authorization_url().contains("shh"));
    }

    #[test]
    fn test_userinfo_maps_to_identity() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"sub":"1098","email":"g@example.com","email_verified":true,"given_name":"Grace","family_name":"Hopper","picture":"https://img/p.png"}"#,
        )
        .unwrap();

        let identity = ExternalIdentity::try_from(info).unwrap();

        assert_eq!(identity.external_id, "1098");
        assert!(identity.email_verified);
        assert_eq!(identity.given_name.as_deref(), Some("Grace"));
        assert_eq!(identity.picture.as_deref(), Some("https://img/p.png"));
    }

    #[test]
    fn test_userinfo_without_verification_flag_is_unverified() {
        let info: GoogleUserInfo =
            serde_json::from_str(r#"{"sub":"1098","email":"g@example.com"}"#).unwrap();

        let identity = ExternalIdentity::try_from(info).unwrap();

        assert!(!identity.email_verified);
    }

    #[test]
    fn test_userinfo_without_email_is_rejected() {
        let info: GoogleUserInfo = serde_json::from_str(r#"{"sub":"1098"}"#).unwrap();

        assert!(matches!(
            ExternalIdentity::try_from(info),
            Err(ProviderError::MissingClaim("email"))
        ));
    }
}
