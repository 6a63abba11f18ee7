//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{JwtConfig, LocalMediaConfig};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;
#[cfg(feature = "oauth")]
use quill_infra::GoogleOAuthConfig;
#[cfg(feature = "mail")]
use quill_infra::SmtpConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on in-memory stores.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// `None` disables the Google sign-in routes.
    #[cfg(feature = "oauth")]
    pub google: Option<GoogleOAuthConfig>,
    /// `None` logs outgoing mail instead of sending it.
    #[cfg(feature = "mail")]
    pub smtp: Option<SmtpConfig>,
    /// Where the OAuth callback sends the browser with its token.
    pub frontend_url: String,
    /// Browser origins allowed to call the API. `*` allows any.
    pub cors_origins: Vec<String>,
    pub media: LocalMediaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let frontend_url =
            env::var("FRONTEND_HOST").unwrap_or_else(|_| "http://localhost:5173".to_string());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "oauth")]
            google: GoogleOAuthConfig::from_env(),
            #[cfg(feature = "mail")]
            smtp: SmtpConfig::from_env(),
            cors_origins: parse_origins(env::var("CORS_ORIGINS").ok().as_deref(), &frontend_url),
            frontend_url,
            media: LocalMediaConfig::from_env(),
        }
    }
}

/// Comma-separated origins, falling back to the frontend's own origin.
fn parse_origins(raw: Option<&str>, frontend_url: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() {
        vec![frontend_url.trim_end_matches('/').to_string()]
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn origins_default_to_the_frontend() {
        assert_eq!(
            parse_origins(None, "http://localhost:5173/"),
            vec!["http://localhost:5173"]
        );
        assert_eq!(
            parse_origins(Some(" , "), "http://localhost:5173"),
            vec!["http://localhost:5173"]
        );
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(Some("https://a.test/, https://b.test"), "http://localhost:5173"),
            vec!["https://a.test", "https://b.test"]
        );
    }
}
