//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    AuthorRepository, IdentityProvider, Mailer, MediaStore, PasswordService, PostRepository,
};
use quill_core::services::{AuthGate, CommentManager, OAuthDelegate, SessionService};
use quill_infra::{
    Argon2PasswordService, InMemoryAuthorRepository, InMemoryPostRepository,
    InMemoryRevocationStore, JwtTokenService, LocalMediaStore, LoggingMailer,
};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresAuthorRepository, PostgresPostRepository, database::connect};
#[cfg(feature = "oauth")]
use quill_infra::GoogleIdentityProvider;
#[cfg(feature = "mail")]
use quill_infra::SmtpMailer;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authors: Arc<dyn AuthorRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub passwords: Arc<dyn PasswordService>,
    pub sessions: Arc<SessionService>,
    pub gate: Arc<AuthGate>,
    pub comments: Arc<CommentManager>,
    /// `None` when Google sign-in is not configured.
    pub oauth: Option<Arc<OAuthDelegate>>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
    pub frontend_url: String,
}

type Stores = (Arc<dyn AuthorRepository>, Arc<dyn PostRepository>);

fn in_memory_stores() -> Stores {
    (
        Arc::new(InMemoryAuthorRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (authors, posts) = Self::stores(config).await;

        let sessions = Arc::new(SessionService::new(
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(InMemoryRevocationStore::new()),
        ));

        let state = Self::assemble(
            authors,
            posts,
            Arc::new(Argon2PasswordService::from_env()),
            sessions,
            Self::identity_provider(config),
            Arc::new(LocalMediaStore::new(config.media.clone())),
            config.frontend_url.clone(),
        )
        .with_mailer(Self::mailer(config));

        tracing::info!(
            google_sign_in = state.oauth.is_some(),
            "Application state initialized"
        );
        state
    }

    /// Wire the core services over the given ports. Mail is logged until
    /// [`AppState::with_mailer`] supplies a transport.
    pub fn assemble(
        authors: Arc<dyn AuthorRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        sessions: Arc<SessionService>,
        provider: Option<Arc<dyn IdentityProvider>>,
        media: Arc<dyn MediaStore>,
        frontend_url: String,
    ) -> Self {
        let gate = Arc::new(AuthGate::new(sessions.clone(), authors.clone()));
        let comments = Arc::new(CommentManager::new(posts.clone()));
        let oauth = provider.map(|provider| {
            Arc::new(OAuthDelegate::new(
                provider,
                authors.clone(),
                sessions.clone(),
            ))
        });

        Self {
            authors,
            posts,
            passwords,
            sessions,
            gate,
            comments,
            oauth,
            media,
            mailer: Arc::new(LoggingMailer),
            frontend_url,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    #[cfg(feature = "postgres")]
    async fn stores(config: &AppConfig) -> Stores {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return in_memory_stores();
        };

        match connect(db_config).await {
            Ok(db) => (
                Arc::new(PostgresAuthorRepository::new(db.clone())),
                Arc::new(PostgresPostRepository::new(db)),
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                in_memory_stores()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn stores(_config: &AppConfig) -> Stores {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        in_memory_stores()
    }

    #[cfg(feature = "oauth")]
    fn identity_provider(config: &AppConfig) -> Option<Arc<dyn IdentityProvider>> {
        let Some(google) = config.google.clone() else {
            tracing::info!("Google credentials not set. Google sign-in disabled.");
            return None;
        };

        match GoogleIdentityProvider::new(google) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                tracing::error!(error = %e, "Invalid Google OAuth configuration. Google sign-in disabled.");
                None
            }
        }
    }

    #[cfg(not(feature = "oauth"))]
    fn identity_provider(_config: &AppConfig) -> Option<Arc<dyn IdentityProvider>> {
        None
    }

    #[cfg(feature = "mail")]
    fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
        let Some(smtp) = config.smtp.clone() else {
            tracing::info!("SMTP_HOST not set. Outgoing mail will only be logged.");
            return Arc::new(LoggingMailer);
        };

        match SmtpMailer::new(smtp) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::error!(error = %e, "Invalid SMTP configuration. Outgoing mail will only be logged.");
                Arc::new(LoggingMailer)
            }
        }
    }

    #[cfg(not(feature = "mail"))]
    fn mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
        Arc::new(LoggingMailer)
    }
}
