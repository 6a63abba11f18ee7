//! Comment sub-resource of a post.
//!
//! Comments are written as the caller: the commenter email always comes
//! from the session. Editing and removal are open to the commenter and to
//! the post's author.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::DomainError;
use quill_shared::MessageResponse;
use quill_shared::dto::{CommentRequest, CommentsResponse, EditCommentRequest};

use super::views::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Refuse unless the caller wrote the comment or owns the post.
async fn ensure_can_modify(
    state: &AppState,
    identity: &Identity,
    post_id: Uuid,
    comment_id: Uuid,
) -> AppResult<()> {
    let post = state.comments.post(post_id).await?;
    let comment = post
        .comment(comment_id)
        .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

    if comment.commenter_email == identity.email() || post.is_authored_by(identity.email()) {
        Ok(())
    } else {
        tracing::info!(
            author_id = %identity.author.id,
            %post_id,
            %comment_id,
            "Refused change to another author's comment"
        );
        Err(AppError::Forbidden)
    }
}

/// GET /api/v1/posts/{id}/comments
pub async fn list(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(CommentsResponse {
        data: comments.iter().map(comment_response).collect(),
    }))
}

/// GET /api/v1/posts/{id}/comments/{comment_id}
pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state.comments.get(post_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(comment_response(&comment)))
}

/// POST /api/v1/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let commenter_name = req
        .commenter_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| identity.author.full_name());

    let comment = state
        .comments
        .add(path.into_inner(), &commenter_name, identity.email(), &req.text)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(&comment)))
}

/// PUT /api/v1/posts/{id}/comment/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<EditCommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let text = body.into_inner().text;

    // Blank text is reported before any lookup.
    if let Some(err) = DomainError::blank_fields(&[("text", text.as_str())]) {
        return Err(err.into());
    }
    ensure_can_modify(&state, &identity, post_id, comment_id).await?;

    let comment = state.comments.edit(post_id, comment_id, &text).await?;

    Ok(HttpResponse::Ok().json(comment_response(&comment)))
}

/// DELETE /api/v1/posts/{id}/comment/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    ensure_can_modify(&state, &identity, post_id, comment_id).await?;

    state.comments.remove(post_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted")))
}
