//! Comment lifecycle inside the post aggregate.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Operations over a post's comment collection.
///
/// Every mutation reads the whole post, changes it and writes it back.
/// Concurrent mutations on one post are last-write-wins. Callers decide
/// who may edit or remove a comment; this type does not.
pub struct CommentManager {
    posts: Arc<dyn PostRepository>,
}

impl CommentManager {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Load the owning post.
    pub async fn post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    pub async fn list(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.post(post_id).await?.comments)
    }

    pub async fn get(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.post(post_id)
            .await?
            .comment(comment_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))
    }

    pub async fn add(
        &self,
        post_id: Uuid,
        commenter_name: &str,
        commenter_email: &str,
        text: &str,
    ) -> Result<Comment, DomainError> {
        if let Some(err) = DomainError::blank_fields(&[
            ("commenterName", commenter_name),
            ("commenterEmail", commenter_email),
            ("text", text),
        ]) {
            return Err(err);
        }

        let mut post = self.post(post_id).await?;
        let comment = post
            .push_comment(Comment::new(commenter_name, commenter_email, text))
            .clone();
        self.persist(post).await?;

        tracing::debug!(post_id = %post_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    pub async fn edit(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Comment, DomainError> {
        if let Some(err) = DomainError::blank_fields(&[("text", text)]) {
            return Err(err);
        }

        let mut post = self.post(post_id).await?;
        let comment = post
            .comment_mut(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;
        comment.edit(text);
        let edited = comment.clone();
        post.touch();
        self.persist(post).await?;

        Ok(edited)
    }

    pub async fn remove(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), DomainError> {
        let mut post = self.post(post_id).await?;
        post.remove_comment(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;
        self.persist(post).await?;

        tracing::debug!(post_id = %post_id, comment_id = %comment_id, "Comment removed");
        Ok(())
    }

    async fn persist(&self, post: Post) -> Result<Post, DomainError> {
        let post_id = post.id;
        self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", post_id),
            other => other.into(),
        })
    }
}
