//! Announcement term enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Term an announcement is filed under, stored with its Japanese label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notice_term")]
pub enum NoticeTerm {
    /// First term.
    #[serde(rename = "前期")]
    #[sqlx(rename = "前期")]
    Early,
    /// Second term.
    #[serde(rename = "後期")]
    #[sqlx(rename = "後期")]
    Late,
}

impl NoticeTerm {
    /// Return the stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "前期",
            Self::Late => "後期",
        }
    }
}

impl fmt::Display for NoticeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NoticeTerm {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "前期" => Ok(Self::Early),
            "後期" => Ok(Self::Late),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid semester: '{s}'. Expected '前期' or '後期'"
            ))),
        }
    }
}
