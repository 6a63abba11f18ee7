//! Data Transfer Objects - request/response types for the API.
//!
//! JSON field names are camelCase. Request fields default to empty so that
//! missing values reach handler validation instead of failing deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /authors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterAuthorRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
}

/// POST /login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an author. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub avatar: Option<String>,
    pub google_linked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returned by registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthorResponse,
}

/// PUT /authors/{id}. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAuthorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadTimeDto {
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// POST /posts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePostRequest {
    pub category: String,
    pub title: String,
    pub cover: Option<String>,
    pub read_time: Option<ReadTimeDto>,
    /// Email of an existing author.
    pub author: String,
    pub content: String,
}

/// PUT /posts/{id}. Comments are not editable through this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePostRequest {
    pub category: Option<String>,
    pub title: Option<String>,
    pub cover: Option<String>,
    pub read_time: Option<ReadTimeDto>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub commenter_name: String,
    pub commenter_email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub cover: Option<String>,
    pub read_time: ReadTimeDto,
    pub author: String,
    /// Full name of the author, or the raw email when that author is gone.
    pub author_name: String,
    pub content: String,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /posts/author/{authorId}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPostsResponse {
    pub author: AuthorResponse,
    pub data: Vec<PostResponse>,
    pub total_items: u64,
}

/// POST /posts/{id}/comments. The commenter email is taken from the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRequest {
    pub commenter_name: Option<String>,
    pub text: String,
}

/// PUT /posts/{id}/comment/{commentId}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditCommentRequest {
    pub text: String,
}

/// GET /posts/{id}/comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub data: Vec<CommentResponse>,
}

/// `?page=&limit=&title=`. Kept as raw strings; unparsable values fall back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub title: Option<String>,
}
