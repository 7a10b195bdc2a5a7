//! Repository bundle selected by configuration.

use std::sync::Arc;

use tracing::info;

use portal_core::config::{DatabaseConfig, DatabaseProvider};
use portal_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::migration::run_migrations;
use crate::repositories::{
    MemoryNotificationRepository, MemoryProgressRepository, MemoryUserRepository,
    MemoryVideoRepository, NotificationRepository, PgNotificationRepository,
    PgProgressRepository, PgUserRepository, PgVideoRepository, ProgressRepository,
    UserRepository, VideoRepository,
};

/// Every repository the services need, behind trait objects.
#[derive(Debug, Clone)]
pub struct Store {
    /// User profiles.
    pub users: Arc<dyn UserRepository>,
    /// Video catalog.
    pub videos: Arc<dyn VideoRepository>,
    /// Playback progress.
    pub progress: Arc<dyn ProgressRepository>,
    /// Announcements.
    pub notifications: Arc<dyn NotificationRepository>,
    pool: Option<DatabasePool>,
}

impl Store {
    /// Open the store named by `config.provider`.
    ///
    /// For PostgreSQL this connects and applies pending migrations.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                run_migrations(db.pool()).await?;
                Ok(Self::postgres(db))
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory document store; data is lost on restart");
                Ok(Self::memory())
            }
        }
    }

    /// Repositories backed by a PostgreSQL pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            videos: Arc::new(PgVideoRepository::new(pool.clone())),
            progress: Arc::new(PgProgressRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool)),
            pool: Some(db),
        }
    }

    /// Fresh, empty in-memory repositories.
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            videos: Arc::new(MemoryVideoRepository::new()),
            progress: Arc::new(MemoryProgressRepository::new()),
            notifications: Arc::new(MemoryNotificationRepository::new()),
            pool: None,
        }
    }

    /// Assemble a store from individual repositories.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        videos: Arc<dyn VideoRepository>,
        progress: Arc<dyn ProgressRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            users,
            videos,
            progress,
            notifications,
            pool: None,
        }
    }

    /// Whether the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(db) => db.health_check().await,
            None => Ok(true),
        }
    }

    /// Release database connections, if any.
    pub async fn close(&self) {
        if let Some(db) = &self.pool {
            db.close().await;
        }
    }
}
