//! User profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::UserRole;

/// A signed-in member of the organization.
///
/// Keyed by the identity provider's subject id. Created on first sign-in and
/// rewritten (merge semantics) on every later one; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity provider subject id.
    pub id: String,
    /// Verified email address.
    pub email: String,
    /// Role derived from the email local-part.
    pub role: UserRole,
    /// Display name reported by the identity provider.
    pub display_name: Option<String>,
    /// First sign-in time.
    pub created_at: DateTime<Utc>,
    /// Most recent sign-in time.
    pub updated_at: DateTime<Utc>,
}

/// Fields written on every sign-in. Anything not listed here is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpsert {
    /// Identity provider subject id.
    pub id: String,
    /// Verified email address.
    pub email: String,
    /// Freshly derived role.
    pub role: UserRole,
    /// Display name, if the provider supplied one.
    pub display_name: Option<String>,
}

impl ProfileUpsert {
    /// Apply this upsert on top of an existing profile (or create one).
    pub fn merge_into(self, existing: Option<UserProfile>, now: DateTime<Utc>) -> UserProfile {
        match existing {
            Some(profile) => UserProfile {
                email: self.email,
                role: self.role,
                display_name: self.display_name,
                updated_at: now,
                ..profile
            },
            None => UserProfile {
                id: self.id,
                email: self.email,
                role: self.role,
                display_name: self.display_name,
                created_at: now,
                updated_at: now,
            },
        }
    }
}
