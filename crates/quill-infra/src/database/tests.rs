#[cfg(test)]
mod tests {
    use quill_core::domain::{Author, Comment, Post};
    use quill_core::error::RepoError;
    use quill_core::ports::{AuthorRepository, BaseRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::database::entity::post::StoredComments;
    use crate::database::entity::{author, post};
    use crate::database::postgres_repo::{PostgresAuthorRepository, PostgresPostRepository};

    fn post_model(id: uuid::Uuid, comments: Vec<Comment>) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            category: "rust".to_owned(),
            title: "Test Post".to_owned(),
            cover: None,
            read_time_value: 4,
            read_time_unit: "minutes".to_owned(),
            author: "a@x.com".to_owned(),
            content: "Content".to_owned(),
            comments: StoredComments(comments),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id_with_embedded_comments() {
        let post_id = uuid::Uuid::new_v4();
        let comment = Comment::new("Bob", "bob@x.com", "Nice post");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, vec![comment.clone()])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.read_time.value, 4);
        assert_eq!(post.comments, vec![comment]);
    }

    #[tokio::test]
    async fn test_insert_author_returns_stored_row() {
        let author = Author::with_password(
            "a@x.com",
            "hash".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            None,
        );
        let row = author::Model {
            id: author.id,
            email: author.email.clone(),
            password_hash: author.password_hash.clone(),
            google_id: None,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            birth_date: None,
            avatar: None,
            created_at: author.created_at.into(),
            updated_at: author.updated_at.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresAuthorRepository::new(db);

        let saved: Author = repo.insert(author.clone()).await.unwrap();

        assert_eq!(saved.id, author.id);
        assert_eq!(saved.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_find_author_by_email_misses() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<author::Model>::new()])
            .into_connection();

        let repo = PostgresAuthorRepository::new(db);

        assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reassign_email_rewrites_matching_posts() {
        let post_id = uuid::Uuid::new_v4();
        let comment = Comment::new("Ada", "a@x.com", "Replying to myself");
        let stored = post_model(post_id, vec![comment.clone()]);

        let mut rewritten = stored.clone();
        rewritten.author = "new@x.com".to_owned();
        rewritten.comments.0[0].commenter_email = "new@x.com".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored]])
            .append_query_results(vec![vec![rewritten]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let changed = repo.reassign_email("A@x.com", "new@x.com").await.unwrap();

        assert_eq!(changed, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
