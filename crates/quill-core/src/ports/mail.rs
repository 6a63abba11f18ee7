//! Outbound e-mail port.

use async_trait::async_trait;

use crate::domain::{Author, Post};

/// A plain-text e-mail to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Notice sent to an author once their post is live.
    pub fn post_published(author: &Author, post: &Post) -> Self {
        Self {
            to: author.email.clone(),
            subject: "Your new post is live!".to_string(),
            body: format!(
                "Hi {}, your post \"{}\" has been published!",
                author.first_name, post.title
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReadTime;

    #[test]
    fn post_published_addresses_the_author() {
        let author = Author::with_password(
            "Ada@X.com",
            "hash".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            None,
        );
        let post = Post::new(
            "history".to_string(),
            "The Engine".to_string(),
            ReadTime::new(5, None),
            &author.email,
            "Body".to_string(),
        );

        let message = EmailMessage::post_published(&author, &post);

        assert_eq!(message.to, author.email);
        assert!(message.body.starts_with("Hi Ada,"));
        assert!(message.body.contains("\"The Engine\""));
    }
}
