//! The signed-in session persisted between invocations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use portal_auth::session::SessionRecord;
use portal_core::result::AppResult;

/// Default file holding the session token.
pub const DEFAULT_SESSION_FILE: &str = ".portal-session";

/// What is written to disk after sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token.
    pub token: String,
    /// Session as reported at sign-in.
    pub session: SessionRecord,
}

/// A session file at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Session file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if a readable one exists.
    ///
    /// A corrupt file is treated as absent.
    pub async fn load(&self) -> AppResult<Option<StoredSession>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&raw) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    /// Replace the stored session.
    pub async fn save(&self, stored: &StoredSession) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(stored)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Forget the stored session. A missing file is fine.
    pub async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
