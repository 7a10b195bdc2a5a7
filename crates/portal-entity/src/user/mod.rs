//! User domain entities.

pub mod model;
pub mod role;

pub use model::{ProfileUpsert, UserProfile};
pub use role::UserRole;
