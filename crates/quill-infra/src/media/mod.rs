//! Upload storage.

mod local;

pub use local::{LocalMediaConfig, LocalMediaStore};
