//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role derived from the email local-part at every sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// May upload videos and manage announcements.
    Teacher,
    /// May browse, search, and watch.
    Student,
    /// Member of the organization whose address matches neither pattern.
    Unknown,
}

impl UserRole {
    /// Whether this role may author content (videos, announcements).
    pub fn is_teacher(&self) -> bool {
        matches!(self, Self::Teacher)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            "unknown" => Ok(Self::Unknown),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: teacher, student, unknown"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_teacher_authors() {
        assert!(UserRole::Teacher.is_teacher());
        assert!(!UserRole::Student.is_teacher());
        assert!(!UserRole::Unknown.is_teacher());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("teacher".parse::<UserRole>().unwrap(), UserRole::Teacher);
        assert_eq!("STUDENT".parse::<UserRole>().unwrap(), UserRole::Student);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&UserRole::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}
