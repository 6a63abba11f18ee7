//! Domain-to-wire conversions shared by the handlers.

use std::collections::HashMap;

use quill_core::RepoError;
use quill_core::domain::{AuthorProfile, Comment, Page, Post};
use quill_core::ports::AuthorRepository;
use quill_shared::Paginated;
use quill_shared::dto::{AuthorResponse, CommentResponse, PostResponse, ReadTimeDto};

pub fn author_response(profile: &AuthorProfile) -> AuthorResponse {
    AuthorResponse {
        id: profile.id,
        email: profile.email.clone(),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        birth_date: profile.birth_date,
        avatar: profile.avatar.clone(),
        google_linked: profile.google_id.is_some(),
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }
}

pub fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        commenter_name: comment.commenter_name.clone(),
        commenter_email: comment.commenter_email.clone(),
        text: comment.text.clone(),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub fn post_response(post: Post, author_name: String) -> PostResponse {
    PostResponse {
        id: post.id,
        category: post.category,
        title: post.title,
        cover: post.cover,
        read_time: ReadTimeDto {
            value: post.read_time.value,
            unit: Some(post.read_time.unit),
        },
        author: post.author,
        author_name,
        content: post.content,
        comments: post.comments.iter().map(comment_response).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn paginated<T>(page: Page<T>) -> Paginated<T> {
    let total_pages = page.total_pages();
    Paginated {
        page_size: page.items.len() as u64,
        page: page.request.page,
        total_items: page.total,
        total_pages,
        data: page.items,
    }
}

/// Resolves `authorName` for posts, looking each email up once per request.
pub struct AuthorNames<'a> {
    authors: &'a dyn AuthorRepository,
    cache: HashMap<String, String>,
}

impl<'a> AuthorNames<'a> {
    pub fn new(authors: &'a dyn AuthorRepository) -> Self {
        Self {
            authors,
            cache: HashMap::new(),
        }
    }

    /// Full name of the author with this email, or the email itself when
    /// that author no longer exists.
    pub async fn name_for(&mut self, email: &str) -> Result<String, RepoError> {
        if let Some(name) = self.cache.get(email) {
            return Ok(name.clone());
        }

        let name = match self.authors.find_by_email(email).await? {
            Some(author) => author.full_name(),
            None => email.to_string(),
        };
        self.cache.insert(email.to_string(), name.clone());
        Ok(name)
    }

    pub async fn enrich(&mut self, post: Post) -> Result<PostResponse, RepoError> {
        let name = self.name_for(&post.author).await?;
        Ok(post_response(post, name))
    }
}
