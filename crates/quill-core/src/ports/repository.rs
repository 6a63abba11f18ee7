use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, Page, PageRequest, Post};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key clashes surface as `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity as a whole. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Author (credential) store.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    /// Find an author by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError>;

    /// Find an author by external identity reference.
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<Author>, RepoError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<Author>, RepoError>;
}

/// Post store. Comments are persisted inside their post.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Newest first, optionally filtered by a case-insensitive title substring.
    async fn list(&self, title: Option<&str>, page: PageRequest)
    -> Result<Page<Post>, RepoError>;

    /// All posts by one author email, newest first.
    async fn find_by_author(&self, email: &str) -> Result<Vec<Post>, RepoError>;

    /// Rewrite post authorship and comment attribution after an author's
    /// email changes. Returns the number of posts touched.
    async fn reassign_email(&self, from: &str, to: &str) -> Result<u64, RepoError>;
}
