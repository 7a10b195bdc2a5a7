//! One repository per collection.
//!
//! Each module defines the repository trait, a PostgreSQL implementation
//! (`Pg*`), and a `DashMap`-backed implementation (`Memory*`) used for local
//! development and tests.

pub mod notification;
pub mod progress;
pub mod user;
pub mod video;

pub use notification::{
    MemoryNotificationRepository, NotificationFilter, NotificationRepository,
    PgNotificationRepository,
};
pub use progress::{MemoryProgressRepository, PgProgressRepository, ProgressRepository};
pub use user::{MemoryUserRepository, PgUserRepository, UserRepository};
pub use video::{
    MemoryVideoRepository, NewVideo, PgVideoRepository, VideoRepository, VideoSearch,
};
