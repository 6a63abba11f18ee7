//! # Quill API Server
//!
//! Actix-web surface of the Quill blog backend. The binary in `main.rs`
//! wires these modules; integration tests build the same app in-process.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
