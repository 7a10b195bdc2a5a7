//! Sign-in, sign-out, and profile lookup.

pub mod service;

pub use service::{AuthService, SignInResult};
