//! Core services wired to the in-memory stores and the real JWT signer.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Author, Post, ReadTime};
use quill_core::ports::{
    AuthError, AuthorRepository, BaseRepository, ExternalIdentity, IdentityProvider,
    PasswordService, ProviderError,
};
use quill_core::services::{
    AuthGate, CommentManager, DelegateError, OAuthDelegate, SessionService,
};
use quill_infra::{
    Argon2PasswordService, InMemoryAuthorRepository, InMemoryPostRepository,
    InMemoryRevocationStore, JwtConfig, JwtTokenService,
};

struct Harness {
    authors: Arc<InMemoryAuthorRepository>,
    posts: Arc<InMemoryPostRepository>,
    sessions: Arc<SessionService>,
    gate: AuthGate,
}

fn harness() -> Harness {
    let authors = Arc::new(InMemoryAuthorRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let sessions = Arc::new(SessionService::new(
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "integration-secret".to_string(),
            ..JwtConfig::default()
        })),
        Arc::new(InMemoryRevocationStore::new()),
    ));
    let gate = AuthGate::new(sessions.clone(), authors.clone());

    Harness {
        authors,
        posts,
        sessions,
        gate,
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Identity provider returning a fixed identity for any code.
struct StaticProvider {
    identity: ExternalIdentity,
}

#[async_trait]
impl IdentityProvider for StaticProvider {
    fn authorization_url(&self) -> String {
        "https://idp.test/consent".to_string()
    }

    async fn exchange(&self, code: &str) -> Result<ExternalIdentity, ProviderError> {
        if code == "bad" {
            return Err(ProviderError::Rejected("invalid_grant".to_string()));
        }
        Ok(self.identity.clone())
    }
}

fn google_identity(external_id: &str, email: &str) -> ExternalIdentity {
    ExternalIdentity {
        external_id: external_id.to_string(),
        email: email.to_string(),
        email_verified: true,
        given_name: Some("Grace".to_string()),
        family_name: Some("Hopper".to_string()),
        picture: Some("https://img.test/grace.png".to_string()),
    }
}

#[tokio::test]
async fn registered_author_can_log_in_and_pass_the_gate() {
    let h = harness();
    let passwords = Argon2PasswordService::with_params(1024, 1, 1).unwrap();

    let hash = passwords.hash("pw123").unwrap();
    let author = h
        .authors
        .insert(Author::with_password(
            "a@x.com",
            hash,
            "Ada".to_string(),
            "Lovelace".to_string(),
            None,
        ))
        .await
        .unwrap();

    let stored = h.authors.find_by_email("A@X.com").await.unwrap().unwrap();
    let stored_hash = stored.password_hash.as_deref().unwrap();
    assert!(passwords.verify("pw123", stored_hash).unwrap());

    let token = h.sessions.issue(stored.id, &stored.email).unwrap();
    let session = h.gate.authenticate(Some(bearer(&token).as_str())).await.unwrap();

    assert_eq!(session.author.id, author.id);
    assert_eq!(session.author.email, "a@x.com");
    assert_eq!(session.token, token);
}

#[tokio::test]
async fn revoked_token_is_rejected_before_expiry() {
    let h = harness();
    let author = h
        .authors
        .insert(Author::with_password(
            "a@x.com",
            "hash".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            None,
        ))
        .await
        .unwrap();
    let token = h.sessions.issue(author.id, &author.email).unwrap();
    let other = h.sessions.issue(author.id, &author.email).unwrap();

    h.sessions.revoke(&token).await;
    h.sessions.revoke(&token).await;

    assert!(h.sessions.is_revoked(&token).await);
    assert!(h.sessions.verify(&token).is_ok(), "signature and expiry still hold");
    assert!(matches!(
        h.gate.authenticate(Some(bearer(&token).as_str())).await,
        Err(AuthError::Revoked)
    ));
    // Another session for the same author is unaffected.
    assert!(h.gate.authenticate(Some(bearer(&other).as_str())).await.is_ok());
}

#[tokio::test]
async fn gate_rejections() {
    let h = harness();

    assert!(matches!(h.gate.authenticate(None).await, Err(AuthError::MissingToken)));
    assert!(matches!(
        h.gate.authenticate(Some("Bearer not-a-jwt")).await,
        Err(AuthError::Malformed(_))
    ));

    let ghost = h.sessions.issue(Uuid::new_v4(), "ghost@x.com").unwrap();
    assert!(matches!(
        h.gate.authenticate(Some(bearer(&ghost).as_str())).await,
        Err(AuthError::UnknownSubject)
    ));
}

#[tokio::test]
async fn oauth_callback_twice_creates_one_author() {
    let h = harness();
    let delegate = OAuthDelegate::new(
        Arc::new(StaticProvider {
            identity: google_identity("google-42", "grace@x.com"),
        }),
        h.authors.clone(),
        h.sessions.clone(),
    );

    let first = delegate.complete("code-1").await.unwrap();
    let second = delegate.complete("code-2").await.unwrap();

    assert_eq!(first.author.id, second.author.id);
    assert!(first.author.password_hash.is_none());
    assert_eq!(first.author.google_id.as_deref(), Some("google-42"));
    assert_eq!(first.author.first_name, "Grace");

    let all = h
        .authors
        .list(quill_core::domain::PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total, 1);

    let session = h.gate.authenticate(Some(bearer(&second.token).as_str())).await.unwrap();
    assert_eq!(session.author.id, first.author.id);
}

#[tokio::test]
async fn oauth_links_existing_password_account() {
    let h = harness();
    let existing = h
        .authors
        .insert(Author::with_password(
            "grace@x.com",
            "hash".to_string(),
            "Grace".to_string(),
            "Hopper".to_string(),
            None,
        ))
        .await
        .unwrap();
    let delegate = OAuthDelegate::new(
        Arc::new(StaticProvider {
            identity: google_identity("google-42", "Grace@X.com"),
        }),
        h.authors.clone(),
        h.sessions.clone(),
    );

    let resolved = delegate
        .resolve(google_identity("google-42", "Grace@X.com"))
        .await
        .unwrap();

    assert_eq!(resolved.id, existing.id);
    assert!(resolved.password_hash.is_some());
    assert_eq!(resolved.google_id.as_deref(), Some("google-42"));
}

#[tokio::test]
async fn oauth_unverified_email_neither_links_nor_creates() {
    let h = harness();
    let existing = h
        .authors
        .insert(Author::with_password(
            "grace@x.com",
            "hash".to_string(),
            "Grace".to_string(),
            "Hopper".to_string(),
            None,
        ))
        .await
        .unwrap();
    let unverified = ExternalIdentity {
        email_verified: false,
        ..google_identity("google-66", "grace@x.com")
    };
    let delegate = OAuthDelegate::new(
        Arc::new(StaticProvider {
            identity: unverified.clone(),
        }),
        h.authors.clone(),
        h.sessions.clone(),
    );

    assert!(matches!(
        delegate.resolve(unverified).await,
        Err(DelegateError::Provider(ProviderError::Rejected(_)))
    ));
    assert!(matches!(
        delegate.complete("code-1").await,
        Err(DelegateError::Provider(ProviderError::Rejected(_)))
    ));

    let stored = h.authors.find_by_id(existing.id).await.unwrap().unwrap();
    assert!(stored.google_id.is_none());
    assert!(h.authors.find_by_google_id("google-66").await.unwrap().is_none());

    let fresh = ExternalIdentity {
        email_verified: false,
        ..google_identity("google-67", "nobody@x.com")
    };
    assert!(delegate.resolve(fresh).await.is_err());
    assert!(h.authors.find_by_email("nobody@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn oauth_provider_failure_issues_no_token() {
    let h = harness();
    let delegate = OAuthDelegate::new(
        Arc::new(StaticProvider {
            identity: google_identity("google-42", "grace@x.com"),
        }),
        h.authors.clone(),
        h.sessions.clone(),
    );

    let result = delegate.complete("bad").await;

    assert!(matches!(result, Err(DelegateError::Provider(_))));
    assert!(h.authors.find_by_google_id("google-42").await.unwrap().is_none());
}

async fn seeded_post(h: &Harness) -> Post {
    h.posts
        .insert(Post::new(
            "rust".to_string(),
            "Lifetimes".to_string(),
            ReadTime::new(7, None),
            "a@x.com",
            "Body".to_string(),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn comment_lifecycle() {
    let h = harness();
    let manager = CommentManager::new(h.posts.clone());
    let post = seeded_post(&h).await;

    let first = manager
        .add(post.id, "Bob", "bob@x.com", "First!")
        .await
        .unwrap();
    let second = manager
        .add(post.id, "Eve", "eve@x.com", "Second")
        .await
        .unwrap();

    let listed = manager.list(post.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.last().unwrap().id, second.id);
    assert!(!second.id.is_nil());

    let edited = manager.edit(post.id, first.id, "Edited").await.unwrap();
    assert_eq!(edited.text, "Edited");
    assert_eq!(edited.commenter_email, "bob@x.com");
    assert_eq!(manager.get(post.id, first.id).await.unwrap().text, "Edited");
    let order: Vec<Uuid> = manager.list(post.id).await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(order, vec![first.id, second.id]);

    manager.remove(post.id, first.id).await.unwrap();
    manager.remove(post.id, second.id).await.unwrap();

    let stored = h.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn comment_errors() {
    let h = harness();
    let manager = CommentManager::new(h.posts.clone());
    let post = seeded_post(&h).await;
    let missing = Uuid::new_v4();

    assert!(matches!(
        manager.add(missing, "Bob", "bob@x.com", "hi").await,
        Err(DomainError::NotFound { entity_type: "Post", .. })
    ));
    assert!(matches!(
        manager.add(post.id, "Bob", "  ", "hi").await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        manager.edit(post.id, missing, "new text").await,
        Err(DomainError::NotFound { entity_type: "Comment", .. })
    ));
    assert!(matches!(
        manager.edit(post.id, missing, "").await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        manager.get(post.id, missing).await,
        Err(DomainError::NotFound { entity_type: "Comment", .. })
    ));
    assert!(matches!(
        manager.remove(post.id, missing).await,
        Err(DomainError::NotFound { entity_type: "Comment", .. })
    ));
}
