//! Authentication extractor backed by the [`AuthGate`](quill_core::services::AuthGate).

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use quill_core::domain::AuthorProfile;
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;

use crate::state::AppState;

/// Authenticated author extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.author.first_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub author: AuthorProfile,
    /// The bearer token this request presented.
    pub token: String,
}

impl Identity {
    pub fn is_author(&self, author_id: Uuid) -> bool {
        self.author.id == author_id
    }

    pub fn email(&self) -> &str {
        &self.author.email
    }
}

/// Error type for authentication failures.
///
/// Every rejection kind answers with the same 401 body; the kind is only logged.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        if self.0.is_rejection() {
            actix_web::http::StatusCode::UNAUTHORIZED
        } else {
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        if !self.0.is_rejection() {
            return actix_web::HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error());
        }

        actix_web::HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(
                ErrorResponse::unauthorized()
                    .with_detail("Please provide a valid Bearer token in the Authorization header."),
            )
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        // A header that is not valid UTF-8 counts as absent.
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AuthenticationError(AuthError::Backend(
                    "application state missing".to_string(),
                )));
            };

            match state.gate.authenticate(authorization.as_deref()).await {
                Ok(session) => Ok(Identity {
                    author: session.author,
                    token: session.token,
                }),
                Err(e) if e.is_rejection() => {
                    tracing::info!(kind = e.kind(), "Request rejected by auth gate");
                    Err(AuthenticationError(e))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Authentication backend failure");
                    Err(AuthenticationError(e))
                }
            }
        })
    }
}
