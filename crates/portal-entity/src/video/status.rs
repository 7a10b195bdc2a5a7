//! Video status and semester enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processing state of a catalog record.
///
/// Only [`VideoStatus::Ready`] records are visible to browse and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "video_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Upload accepted but not yet published.
    Processing,
    /// Published and playable.
    Ready,
}

impl VideoStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Academic half-year a lecture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "video_semester", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VideoSemester {
    /// First half-year.
    First,
    /// Second half-year.
    Second,
}

impl VideoSemester {
    /// Return the semester as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

impl fmt::Display for VideoSemester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoSemester {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "second" => Ok(Self::Second),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid semester: '{s}'. Expected 'first' or 'second'"
            ))),
        }
    }
}
