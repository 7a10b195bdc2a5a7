//! Announcement board.

pub mod service;

pub use service::{NotificationQuery, NotificationService};
