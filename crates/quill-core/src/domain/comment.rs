use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment - child entity of a [`super::Post`], with no life of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub commenter_name: String,
    pub commenter_email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(commenter_name: &str, commenter_email: &str, text: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            commenter_name: commenter_name.trim().to_string(),
            commenter_email: commenter_email.trim().to_lowercase(),
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the text. Commenter identity is left untouched.
    pub fn edit(&mut self, text: &str) {
        self.text = text.to_string();
        self.updated_at = Utc::now();
    }
}
