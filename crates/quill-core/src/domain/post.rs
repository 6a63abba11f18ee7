use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comment::Comment;
use super::author::normalize_email;

pub const DEFAULT_READ_TIME_UNIT: &str = "minutes";

/// Estimated reading time of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadTime {
    pub value: u32,
    pub unit: String,
}

impl ReadTime {
    pub fn new(value: u32, unit: Option<String>) -> Self {
        Self {
            value,
            unit: unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_READ_TIME_UNIT.to_string()),
        }
    }
}

/// Post aggregate - a blog post together with the comments it owns.
///
/// `author` holds the author's email by value; it is checked against the
/// author store when the post is created and never again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub cover: Option<String>,
    pub read_time: ReadTime,
    pub author: String,
    pub content: String,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post without comments.
    pub fn new(
        category: String,
        title: String,
        read_time: ReadTime,
        author: &str,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category: category.trim().to_string(),
            title: title.trim().to_string(),
            cover: None,
            read_time,
            author: normalize_email(author),
            content,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, email: &str) -> bool {
        self.author == normalize_email(email)
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }

    /// Append a comment; creation order is preserved.
    pub fn push_comment(&mut self, comment: Comment) -> &Comment {
        self.comments.push(comment);
        self.touch();
        let last = self.comments.len() - 1;
        &self.comments[last]
    }

    /// Remove a comment in place. Remaining comments keep their order.
    pub fn remove_comment(&mut self, comment_id: Uuid) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        let removed = self.comments.remove(index);
        self.touch();
        Some(removed)
    }

    /// Move authorship and comment attribution from one email to another.
    /// Returns whether anything changed.
    pub fn reassign_email(&mut self, from: &str, to: &str) -> bool {
        let from = normalize_email(from);
        let to = normalize_email(to);
        let mut changed = false;

        if self.author == from {
            self.author = to.clone();
            changed = true;
        }
        for comment in self.comments.iter_mut().filter(|c| c.commenter_email == from) {
            comment.commenter_email = to.clone();
            changed = true;
        }
        changed
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post::new(
            "rust".to_string(),
            "  Ownership  ".to_string(),
            ReadTime::new(5, None),
            "A@X.com",
            "Body".to_string(),
        )
    }

    #[test]
    fn new_post_normalizes_fields() {
        let post = sample_post();

        assert_eq!(post.title, "Ownership");
        assert_eq!(post.author, "a@x.com");
        assert_eq!(post.read_time.unit, DEFAULT_READ_TIME_UNIT);
        assert!(post.comments.is_empty());
        assert!(post.is_authored_by("a@X.COM"));
    }

    #[test]
    fn remove_comment_keeps_order() {
        let mut post = sample_post();
        let first = post.push_comment(Comment::new("a", "a@x.com", "one")).id;
        let second = post.push_comment(Comment::new("b", "b@x.com", "two")).id;
        let third = post.push_comment(Comment::new("c", "c@x.com", "three")).id;

        let removed = post.remove_comment(second).unwrap();

        assert_eq!(removed.text, "two");
        let ids: Vec<Uuid> = post.comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn reassign_email_moves_post_and_comments() {
        let mut post = sample_post();
        post.push_comment(Comment::new("Ada", "a@x.com", "mine"));
        post.push_comment(Comment::new("Bob", "b@x.com", "his"));

        assert!(post.reassign_email("A@x.com", "new@x.com"));

        assert!(post.is_authored_by("new@x.com"));
        assert_eq!(post.comments[0].commenter_email, "new@x.com");
        assert_eq!(post.comments[1].commenter_email, "b@x.com");
        assert!(!post.reassign_email("a@x.com", "other@x.com"));
    }

    #[test]
    fn removing_the_last_comment_leaves_an_empty_collection() {
        let mut post = sample_post();
        let id = post.push_comment(Comment::new("a", "a@x.com", "only")).id;

        post.remove_comment(id);

        assert!(post.comments.is_empty());
        assert!(post.remove_comment(id).is_none());
    }
}
