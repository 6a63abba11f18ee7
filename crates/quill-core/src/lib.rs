//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Entities, the ports infrastructure must implement, and the services that
//! hold the session and comment invariants. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
