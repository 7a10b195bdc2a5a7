//! Axum middleware stack.

pub mod cors;
pub mod logging;
pub mod rbac;
pub mod static_files;
