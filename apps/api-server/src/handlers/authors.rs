//! Author management. Mutations are limited to the author's own record.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Author, PageRequest, normalize_email};
use quill_shared::MessageResponse;
use quill_shared::dto::{PageQuery, UpdateAuthorRequest};

use super::views::{author_response, paginated};
use super::{hash_password, image_format, parse_birth_date};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_author(state: &AppState, id: Uuid) -> AppResult<Author> {
    state
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Author", id).into())
}

fn ensure_self(identity: &Identity, id: Uuid) -> AppResult<()> {
    if identity.is_author(id) {
        Ok(())
    } else {
        tracing::info!(author_id = %identity.author.id, target = %id, "Refused change to another author");
        Err(AppError::Forbidden)
    }
}

/// A present field must not be blank.
fn filled(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::BadRequest(format!("{} cannot be blank", field)))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

/// GET /api/v1/authors?page=&limit=
pub async fn list(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let page = state.authors.list(request).await?;

    Ok(HttpResponse::Ok().json(paginated(page.map(|a| author_response(&a.profile())))))
}

/// GET /api/v1/authors/{id}
pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(author_response(&author.profile())))
}

/// PUT /api/v1/authors/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ensure_self(&identity, id)?;

    let req = body.into_inner();
    let mut author = find_author(&state, id).await?;
    let previous_email = author.email.clone();

    if let Some(first_name) = filled("firstName", req.first_name)? {
        author.first_name = first_name;
    }
    if let Some(last_name) = filled("lastName", req.last_name)? {
        author.last_name = last_name;
    }
    if let Some(birth_date) = filled("birthDate", req.birth_date)? {
        author.birth_date = Some(parse_birth_date(&birth_date)?);
    }
    if let Some(email) = filled("email", req.email)? {
        let email = normalize_email(&email);
        if !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if email != author.email {
            if state.authors.find_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
            author.email = email;
        }
    }
    // The password can be replaced but never cleared.
    if let Some(password) = req.password {
        if password.trim().is_empty() {
            return Err(AppError::BadRequest("password cannot be blank".to_string()));
        }
        author.password_hash = Some(hash_password(&state, password).await?);
    }

    author.touch();
    let author = state.authors.update(author).await?;

    // Posts and comments are owned by email, so they follow the author.
    if author.email != previous_email {
        state
            .posts
            .reassign_email(&previous_email, &author.email)
            .await?;
    }

    tracing::info!(author_id = %author.id, "Author updated");

    Ok(HttpResponse::Ok().json(author_response(&author.profile())))
}

/// DELETE /api/v1/authors/{id} - the author's posts are kept.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ensure_self(&identity, id)?;

    state.authors.delete(id).await?;
    state.sessions.revoke(&identity.token).await;

    tracing::info!(author_id = %id, "Author deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Author deleted")))
}

/// PATCH /api/v1/authors/{id}/avatar - raw jpeg/png request body.
pub async fn upload_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ensure_self(&identity, id)?;

    let mut author = find_author(&state, id).await?;
    let format = image_format(&req)?;

    let url = state.media.store("avatars", format, &body).await?;
    author.avatar = Some(url);
    author.touch();
    let author = state.authors.update(author).await?;

    Ok(HttpResponse::Ok().json(author_response(&author.profile())))
}
