//! User profile repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sqlx::PgPool;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::user::{ProfileUpsert, UserProfile};

/// Access to the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Find a profile by identity provider subject id.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<UserProfile>>;

    /// Write `{email, role, display_name}` with merge semantics.
    ///
    /// Creates the profile on first sign-in; afterwards only the listed
    /// fields and `updated_at` change.
    async fn upsert(&self, profile: ProfileUpsert) -> AppResult<UserProfile>;
}

/// PostgreSQL-backed user repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn upsert(&self, profile: ProfileUpsert) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO users (id, email, role, display_name) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
               email = EXCLUDED.email, \
               role = EXCLUDED.role, \
               display_name = EXCLUDED.display_name, \
               updated_at = NOW() \
             RETURNING *",
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(profile.role)
        .bind(&profile.display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert user", e))
    }
}

/// In-memory user repository.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: DashMap<String, UserProfile>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, profile: ProfileUpsert) -> AppResult<UserProfile> {
        let now = Utc::now();
        let merged = match self.users.entry(profile.id.clone()) {
            Entry::Occupied(mut occupied) => {
                let merged = profile.merge_into(Some(occupied.get().clone()), now);
                occupied.insert(merged.clone());
                merged
            }
            Entry::Vacant(vacant) => vacant.insert(profile.merge_into(None, now)).clone(),
        };
        Ok(merged)
    }
}
