//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Action not permitted for this author")]
    Forbidden,

    #[error("Repository failure: {0}")]
    Repository(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Build a validation error naming every blank field, or `None` if all are filled.
    pub fn blank_fields(fields: &[(&str, &str)]) -> Option<Self> {
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            None
        } else {
            Some(Self::Validation(format!(
                "missing fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_lists_every_missing_name() {
        let err = DomainError::blank_fields(&[("commenterName", " "), ("text", ""), ("email", "a@x.com")])
            .unwrap();

        match err {
            DomainError::Validation(msg) => assert_eq!(msg, "missing fields: commenterName, text"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_fields_accepts_filled_input() {
        assert!(DomainError::blank_fields(&[("text", "hello")]).is_none());
    }
}
