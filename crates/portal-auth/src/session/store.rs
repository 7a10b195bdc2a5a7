//! In-process session registry.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use portal_core::types::SessionId;
use portal_entity::user::UserRole;

/// One signed-in session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Session id.
    pub id: SessionId,
    /// Signed-in user.
    pub user_id: String,
    /// Email at sign-in.
    pub email: String,
    /// Role at sign-in.
    pub role: UserRole,
    /// Sign-in time.
    pub created_at: DateTime<Utc>,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the session is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Live sessions keyed by id. A token whose session is gone is rejected.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionRecord>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session.
    pub fn insert(&self, record: SessionRecord) {
        self.sessions.insert(record.id, record);
    }

    /// Look up a session.
    pub fn get(&self, id: SessionId) -> Option<SessionRecord> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Remove a session, returning it if it existed.
    pub fn remove(&self, id: SessionId) -> Option<SessionRecord> {
        self.sessions.remove(&id).map(|(_, record)| record)
    }

    /// Drop every expired session and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired());
        before - self.sessions.len()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_in: Duration) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            id: SessionId::new(),
            user_id: "u1".into(),
            email: "u1@example.ac.jp".into(),
            role: UserRole::Student,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn test_insert_get_remove() {
        let store = SessionStore::new();
        let rec = record(Duration::hours(1));
        store.insert(rec.clone());
        assert_eq!(store.get(rec.id), Some(rec.clone()));
        assert_eq!(store.remove(rec.id), Some(rec.clone()));
        assert!(store.get(rec.id).is_none());
    }

    #[test]
    fn test_purge_expired() {
        let store = SessionStore::new();
        store.insert(record(Duration::hours(1)));
        store.insert(record(Duration::seconds(-1)));
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }
}
