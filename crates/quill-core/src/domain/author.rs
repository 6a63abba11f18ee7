use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Author entity - identity and credential record.
///
/// An author always has at least one way to sign in: a password hash, an
/// external (Google) identity, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical form of an email used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Author {
    /// Create an author registered with a password.
    pub fn with_password(
        email: &str,
        password_hash: String,
        first_name: String,
        last_name: String,
        birth_date: Option<NaiveDate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash: Some(password_hash),
            google_id: None,
            first_name,
            last_name,
            birth_date,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an author on first sign-in through an external identity provider.
    pub fn with_external_identity(
        email: &str,
        google_id: String,
        first_name: String,
        last_name: String,
        avatar: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash: None,
            google_id: Some(google_id),
            first_name,
            last_name,
            birth_date: None,
            avatar,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn can_authenticate(&self) -> bool {
        self.password_hash.is_some() || self.google_id.is_some()
    }

    /// Attach an external identity to an existing record.
    pub fn link_external_identity(&mut self, google_id: String) -> Result<(), DomainError> {
        match &self.google_id {
            Some(existing) if existing != &google_id => Err(DomainError::Duplicate(
                "author is already linked to another external identity".to_string(),
            )),
            _ => {
                self.google_id = Some(google_id);
                self.touch();
                Ok(())
            }
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Public projection with the credential stripped.
    pub fn profile(&self) -> AuthorProfile {
        AuthorProfile {
            id: self.id,
            email: self.email.clone(),
            google_id: self.google_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date,
            avatar: self.avatar.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// An author as seen by other parties: everything but the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub email: String,
    pub google_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthorProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
