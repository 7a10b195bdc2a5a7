//! Client-side two-phase announcement writes.
//!
//! The terminal client shows a new announcement as soon as the author submits
//! it, then swaps in the server-assigned id and timestamp once the create call
//! returns.

use chrono::{DateTime, Utc};
use portal_core::types::NotificationId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Notification;
use super::term::NoticeTerm;

/// The author-supplied fields of an announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Course the announcement is about.
    pub course: String,
    /// Grade the course is taught in.
    pub grade: i32,
    /// Term.
    pub semester: NoticeTerm,
    /// Optional link to external course material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_link: Option<String>,
}

/// Where an optimistic write stands.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteState {
    /// Shown locally, not yet acknowledged.
    Pending,
    /// Acknowledged; carries the server's identity for the record.
    Confirmed {
        /// Server-assigned id.
        id: NotificationId,
        /// Server-assigned creation time.
        created_at: DateTime<Utc>,
    },
    /// The server rejected the write.
    Failed {
        /// Reason reported to the author.
        reason: String,
    },
}

/// An announcement that may not have reached the server yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticNotification {
    /// Local placeholder id used until confirmation.
    pub local_id: Uuid,
    /// Author-supplied fields.
    pub draft: NotificationDraft,
    /// Write progress.
    pub state: WriteState,
}

impl OptimisticNotification {
    /// Start a pending write.
    pub fn pending(draft: NotificationDraft) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            draft,
            state: WriteState::Pending,
        }
    }

    /// Reconcile with the record the server stored.
    ///
    /// The server's copy of the fields replaces the local draft.
    pub fn confirm(&mut self, stored: &Notification) {
        self.draft = NotificationDraft {
            title: stored.title.clone(),
            content: stored.content.clone(),
            course: stored.course.clone(),
            grade: stored.grade,
            semester: stored.semester,
            repository_link: stored.repository_link.clone(),
        };
        self.state = WriteState::Confirmed {
            id: stored.id,
            created_at: stored.created_at,
        };
    }

    /// Mark the write as rejected.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = WriteState::Failed {
            reason: reason.into(),
        };
    }

    /// Whether the server has acknowledged the write.
    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, WriteState::Confirmed { .. })
    }

    /// The id to display: the server id once confirmed, else the local one.
    pub fn display_id(&self) -> String {
        match &self.state {
            WriteState::Confirmed { id, .. } => id.to_string(),
            _ => format!("pending:{}", self.local_id),
        }
    }
}
