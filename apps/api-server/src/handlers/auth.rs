//! Authentication handlers: registration, login, logout and Google sign-in.

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use quill_core::DomainError;
use quill_core::domain::Author;
use quill_core::ports::AuthError;
use quill_infra::mask_email;
use quill_shared::MessageResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterAuthorRequest};

use super::views::author_response;
use super::{hash_password, parse_birth_date, verify_password};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn auth_response(state: &AppState, token: String, author: &Author) -> AuthResponse {
    AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.sessions.expiration_seconds().max(0) as u64,
        user: author_response(&author.profile()),
    }
}

/// POST /api/v1/authors
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Some(err) = DomainError::blank_fields(&[
        ("firstName", req.first_name.as_str()),
        ("lastName", req.last_name.as_str()),
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
        ("birthDate", req.birth_date.as_str()),
    ]) {
        return Err(err.into());
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    let birth_date = parse_birth_date(&req.birth_date)?;

    if state.authors.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }

    let password_hash = hash_password(&state, req.password).await?;
    let author = state
        .authors
        .insert(Author::with_password(
            &req.email,
            password_hash,
            req.first_name.trim().to_string(),
            req.last_name.trim().to_string(),
            Some(birth_date),
        ))
        .await?;

    let token = state.sessions.issue(author.id, &author.email)?;

    tracing::info!(author_id = %author.id, email = %mask_email(&author.email), "Author registered");

    Ok(HttpResponse::Created().json(auth_response(&state, token, &author)))
}

/// POST /api/v1/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Some(err) = DomainError::blank_fields(&[
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
    ]) {
        return Err(err.into());
    }

    let author = state
        .authors
        .find_by_email(&req.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    // Accounts created through Google sign-in have no password.
    let Some(password_hash) = author.password_hash.clone() else {
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(&state, req.password, password_hash).await? {
        tracing::info!(email = %mask_email(&author.email), "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.sessions.issue(author.id, &author.email)?;

    tracing::info!(author_id = %author.id, "Author logged in");

    Ok(HttpResponse::Ok().json(auth_response(&state, token, &author)))
}

/// POST /api/v1/logout - revokes the presented token only.
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.sessions.revoke(&identity.token).await;

    tracing::info!(author_id = %identity.author.id, "Author logged out");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out")))
}

/// GET /api/v1/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(author_response(&identity.author)))
}

/// GET /api/v1/login-google - redirects to the Google consent screen.
pub async fn login_google(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not configured".to_string()))?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, oauth.authorization_url()))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

/// GET /api/v1/callback-google - completes sign-in and hands the token to
/// the frontend as `?jwt=`.
pub async fn callback_google(
    state: web::Data<AppState>,
    query: web::Query<CallbackQuery>,
) -> AppResult<HttpResponse> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not configured".to_string()))?;

    let query = query.into_inner();
    if let Some(error) = query.error {
        tracing::info!(error = %error, "Google sign-in cancelled by provider");
        return Err(AppError::Unauthorized);
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let login = oauth.complete(&code).await?;

    let location = format!(
        "{}/?jwt={}",
        state.frontend_url.trim_end_matches('/'),
        login.token
    );

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}
