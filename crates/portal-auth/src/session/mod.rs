//! Server-side session lifecycle.

pub mod manager;
pub mod store;

pub use manager::{IssuedSession, SessionManager};
pub use store::{SessionRecord, SessionStore};
