//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod notification;
pub mod progress;
pub mod upload;
pub mod user;
pub mod video;
