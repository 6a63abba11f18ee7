//! Core services - the pieces that hold the session and comment invariants.

mod comments;
mod gate;
mod oauth;
mod session;

pub use comments::CommentManager;
pub use gate::{AuthGate, Session, bearer_token};
pub use oauth::{DelegateError, OAuthDelegate, OAuthLogin};
pub use session::SessionService;
