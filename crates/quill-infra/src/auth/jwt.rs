//! JWT token service implementation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, Clock, SystemClock, TokenClaims, TokenService};

/// Session tokens live for a fixed eight hours.
pub const SESSION_LIFETIME_HOURS: i64 = 8;

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: SESSION_LIFETIME_HOURS,
            issuer: "quill-api".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: SESSION_LIFETIME_HOURS,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "quill-api".to_string()),
        }
    }
}

/// Wire format of the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // author id
    email: String,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
    jti: String, // token id
}

/// HS256 JWT token service. Expiry is judged against the injected clock.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
            clock,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        // Expiry is checked against `self.clock` below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AuthError::Malformed(format!("timestamp out of range: {secs}")))
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = self.clock.now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Malformed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                    _ => AuthError::Malformed(e.to_string()),
                }
            })?;
        let claims = token_data.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        let subject_id =
            Uuid::parse_str(&claims.sub).map_err(|e| AuthError::Malformed(e.to_string()))?;

        Ok(TokenClaims {
            subject_id,
            email: claims.email,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn at(start: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(start)))
        }

        fn advance(&self, delta: TimeDelta) {
            let mut now = self.0.lock().unwrap();
            *now += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: SESSION_LIFETIME_HOURS,
            issuer: "test-issuer".to_string(),
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = JwtTokenService::new(test_config());
        let author_id = Uuid::new_v4();

        let token = service.issue(author_id, "a@x.com").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.subject_id, author_id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(
            (claims.expires_at - claims.issued_at).num_hours(),
            SESSION_LIFETIME_HOURS
        );
    }

    #[test]
    fn test_token_accepted_one_second_after_issue() {
        let clock = ManualClock::at(start());
        let service = JwtTokenService::with_clock(test_config(), clock.clone());
        let token = service.issue(Uuid::new_v4(), "a@x.com").unwrap();

        clock.advance(TimeDelta::seconds(1));

        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn test_token_rejected_at_and_after_lifetime() {
        let clock = ManualClock::at(start());
        let service = JwtTokenService::with_clock(test_config(), clock.clone());
        let token = service.issue(Uuid::new_v4(), "a@x.com").unwrap();

        clock.advance(TimeDelta::hours(SESSION_LIFETIME_HOURS) - TimeDelta::seconds(1));
        assert!(service.verify(&token).is_ok());

        clock.advance(TimeDelta::seconds(1));
        assert!(matches!(service.verify(&token), Err(AuthError::Expired)));

        clock.advance(TimeDelta::seconds(1));
        assert!(matches!(service.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = JwtTokenService::new(test_config());

        let result = service.verify("invalid-token");

        assert!(matches!(result, Err(AuthError::Malformed(_))));
    }

    #[test]
    fn test_foreign_secret_fails_signature() {
        let ours = JwtTokenService::new(test_config());
        let theirs = JwtTokenService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        });

        let token = theirs.issue(Uuid::new_v4(), "a@x.com").unwrap();

        assert!(matches!(ours.verify(&token), Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = service1.issue(Uuid::new_v4(), "test@test.com").unwrap();

        assert!(service2.verify(&token).is_err());
    }

    #[test]
    fn test_tokens_for_same_subject_differ() {
        let clock = ManualClock::at(start());
        let service = JwtTokenService::with_clock(test_config(), clock);
        let author_id = Uuid::new_v4();

        let first = service.issue(author_id, "a@x.com").unwrap();
        let second = service.issue(author_id, "a@x.com").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(JwtConfig::default());

        assert_eq!(service.expiration_seconds(), 8 * 3600);
    }
}
