//! Announcement board entities.

pub mod draft;
pub mod model;
pub mod term;

pub use draft::{NotificationDraft, OptimisticNotification, WriteState};
pub use model::Notification;
pub use term::NoticeTerm;
