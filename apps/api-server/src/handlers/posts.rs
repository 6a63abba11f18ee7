//! Blog posts. Only a post's author may change or delete it. Publishing
//! mails the author a notice.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{PageRequest, Post, ReadTime, normalize_email};
use quill_core::ports::EmailMessage;
use quill_shared::dto::{
    AuthorPostsResponse, CreatePostRequest, PageQuery, PostResponse, ReadTimeDto,
    UpdatePostRequest,
};
use quill_shared::{MessageResponse, Paginated};

use super::image_format;
use super::views::{AuthorNames, author_response, post_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id).into())
}

/// Load a post the caller is allowed to change.
async fn owned_post(state: &AppState, identity: &Identity, id: Uuid) -> AppResult<Post> {
    let post = find_post(state, id).await?;
    if !post.is_authored_by(identity.email()) {
        tracing::info!(author_id = %identity.author.id, post_id = %id, "Refused change to another author's post");
        return Err(AppError::Forbidden);
    }
    Ok(post)
}

fn read_time(dto: ReadTimeDto) -> AppResult<ReadTime> {
    if dto.value < 1 {
        return Err(AppError::BadRequest(
            "readTime.value must be at least 1".to_string(),
        ));
    }
    let unit = dto.unit.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    Ok(ReadTime::new(dto.value, unit))
}

async fn respond(state: &AppState, post: Post) -> AppResult<PostResponse> {
    Ok(AuthorNames::new(state.authors.as_ref()).enrich(post).await?)
}

/// GET /api/v1/posts?title=&page=&limit=
pub async fn list(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let title = query
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let page = state.posts.list(title, request).await?;
    let total_pages = page.total_pages();

    let mut names = AuthorNames::new(state.authors.as_ref());
    let mut data = Vec::with_capacity(page.items.len());
    for post in page.items {
        data.push(names.enrich(post).await?);
    }

    Ok(HttpResponse::Ok().json(Paginated {
        page: page.request.page,
        page_size: data.len() as u64,
        total_items: page.total,
        total_pages,
        data,
    }))
}

/// GET /api/v1/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(respond(&state, post).await?))
}

/// GET /api/v1/posts/author/{author_id}
pub async fn by_author(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let author_id = path.into_inner();
    let author = state
        .authors
        .find_by_id(author_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Author", author_id))?;

    let name = author.full_name();
    let data: Vec<_> = state
        .posts
        .find_by_author(&author.email)
        .await?
        .into_iter()
        .map(|post| post_response(post, name.clone()))
        .collect();

    Ok(HttpResponse::Ok().json(AuthorPostsResponse {
        author: author_response(&author.profile()),
        total_items: data.len() as u64,
        data,
    }))
}

/// POST /api/v1/posts
///
/// `author` defaults to the caller and may not name anyone else.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Some(err) = DomainError::blank_fields(&[
        ("category", req.category.as_str()),
        ("title", req.title.as_str()),
        ("content", req.content.as_str()),
    ]) {
        return Err(err.into());
    }
    let read_time = read_time(
        req.read_time
            .ok_or_else(|| AppError::BadRequest("missing fields: readTime".to_string()))?,
    )?;

    let author_email = if req.author.trim().is_empty() {
        identity.email().to_string()
    } else {
        normalize_email(&req.author)
    };
    if author_email != identity.email() {
        return Err(AppError::Forbidden);
    }
    let author = state
        .authors
        .find_by_email(&author_email)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("author email does not match any author".to_string())
        })?;

    let mut post = Post::new(
        req.category.trim().to_string(),
        req.title.trim().to_string(),
        read_time,
        &author_email,
        req.content,
    );
    post.cover = req.cover.filter(|c| !c.trim().is_empty());

    let post = state.posts.insert(post).await?;

    tracing::info!(post_id = %post.id, author_id = %identity.author.id, "Post created");

    // The post is already stored; a delivery failure is only logged.
    if let Err(e) = state
        .mailer
        .send(EmailMessage::post_published(&author, &post))
        .await
    {
        tracing::warn!(post_id = %post.id, error = %e, "Post notification not sent");
    }

    Ok(HttpResponse::Created().json(respond(&state, post).await?))
}

/// PUT /api/v1/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let mut post = owned_post(&state, &identity, path.into_inner()).await?;
    let req = body.into_inner();

    let blank = |field: &str| AppError::BadRequest(format!("{} cannot be blank", field));

    if let Some(category) = req.category {
        post.category = Some(category.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| blank("category"))?;
    }
    if let Some(title) = req.title {
        post.title = Some(title.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| blank("title"))?;
    }
    if let Some(content) = req.content {
        if content.trim().is_empty() {
            return Err(blank("content"));
        }
        post.content = content;
    }
    if let Some(dto) = req.read_time {
        post.read_time = read_time(dto)?;
    }
    if let Some(cover) = req.cover {
        post.cover = Some(cover).filter(|c| !c.trim().is_empty());
    }

    post.touch();
    let post = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(respond(&state, post).await?))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}

/// PATCH /api/v1/posts/{id}/cover - raw jpeg/png request body.
pub async fn upload_cover(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let mut post = owned_post(&state, &identity, path.into_inner()).await?;
    let format = image_format(&req)?;

    let url = state.media.store("covers", format, &body).await?;
    post.cover = Some(url);
    post.touch();
    let post = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(respond(&state, post).await?))
}
