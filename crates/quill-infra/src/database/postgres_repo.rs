//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use quill_core::domain::{Author, Page, PageRequest, Post, normalize_email};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, PostRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use crate::redact::mask_email;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        tracing::debug!(author_email = %mask_email(email), "Finding author by email");

        let result = AuthorEntity::find()
            .filter(author::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<Author>, RepoError> {
        let result = AuthorEntity::find()
            .filter(author::Column::GoogleId.eq(google_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Author>, RepoError> {
        let paginator = AuthorEntity::find()
            .order_by_desc(author::Column::CreatedAt)
            .paginate(&self.db, page.limit);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let items = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total,
            request: page,
        })
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(
        &self,
        title: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let mut query = PostEntity::find();

        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                    .like(like_pattern(&title.to_lowercase())),
            );
        }

        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, page.limit);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let items = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total,
            request: page,
        })
    }

    async fn find_by_author(&self, email: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Author.eq(normalize_email(email)))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn reassign_email(&self, from: &str, to: &str) -> Result<u64, RepoError> {
        let from = normalize_email(from);
        let to = normalize_email(to);
        let commented = serde_json::json!([{ "commenter_email": from.as_str() }]);

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let candidates = PostEntity::find()
            .filter(
                Condition::any()
                    .add(post::Column::Author.eq(from.as_str()))
                    .add(Expr::cust_with_values("\"comments\" @> $1::jsonb", [commented])),
            )
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        let mut changed = 0;
        for model in candidates {
            let mut updated: Post = model.into();
            if updated.reassign_email(&from, &to) {
                post::ActiveModel::from(updated)
                    .update(&txn)
                    .await
                    .map_err(map_db_err)?;
                changed += 1;
            }
        }
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            from = %mask_email(&from),
            to = %mask_email(&to),
            posts = changed,
            "Reassigned posts to new author email"
        );
        Ok(changed)
    }
}
