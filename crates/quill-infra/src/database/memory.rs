//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Author, Page, PageRequest, Post, normalize_email};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, BaseRepository, PostRepository};

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = (page.offset() as usize).min(items.len());
    let end = (start + page.limit as usize).min(items.len());
    let items = items.drain(start..end).collect();

    Page {
        items,
        total,
        request: page,
    }
}

/// Authors keyed by id, with email and external id uniqueness enforced.
#[derive(Default)]
pub struct InMemoryAuthorRepository {
    store: RwLock<HashMap<Uuid, Author>>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(store: &HashMap<Uuid, Author>, author: &Author) -> Result<(), RepoError> {
        for other in store.values().filter(|a| a.id != author.id) {
            if other.email == author.email {
                return Err(RepoError::Constraint("email already in use".to_string()));
            }
            if author.google_id.is_some() && other.google_id == author.google_id {
                return Err(RepoError::Constraint(
                    "external identity already linked".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Author, Uuid> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, mut author: Author) -> Result<Author, RepoError> {
        author.email = normalize_email(&author.email);
        let mut store = self.store.write().await;

        if store.contains_key(&author.id) {
            return Err(RepoError::Constraint("author id already exists".to_string()));
        }
        Self::check_unique(&store, &author)?;

        store.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, mut author: Author) -> Result<Author, RepoError> {
        author.email = normalize_email(&author.email);
        let mut store = self.store.write().await;

        if !store.contains_key(&author.id) {
            return Err(RepoError::NotFound);
        }
        Self::check_unique(&store, &author)?;

        store.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        let email = normalize_email(email);
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<Author>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|a| a.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Author>, RepoError> {
        let mut authors: Vec<Author> = self.store.read().await.values().cloned().collect();
        authors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(authors, page))
    }
}

/// Posts keyed by id. Each update replaces the whole aggregate.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("post id already exists".to_string()));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(
        &self,
        title: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let needle = title
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let posts = self
            .newest_first(|p| match &needle {
                Some(needle) => p.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .await;

        Ok(paginate(posts, page))
    }

    async fn find_by_author(&self, email: &str) -> Result<Vec<Post>, RepoError> {
        let email = normalize_email(email);
        Ok(self.newest_first(|p| p.author == email).await)
    }

    async fn reassign_email(&self, from: &str, to: &str) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let changed = store
            .values_mut()
            .map(|p| p.reassign_email(from, to))
            .filter(|changed| *changed)
            .count();
        Ok(changed as u64)
    }
}
