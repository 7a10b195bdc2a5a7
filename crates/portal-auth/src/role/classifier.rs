//! Pluggable role classifier.

use regex::Regex;

use portal_core::config::RolePatternConfig;
use portal_core::error::AppError;
use portal_entity::user::UserRole;

/// Maps an email address to a role.
pub trait RoleClassifier: Send + Sync + std::fmt::Debug {
    /// Classify `email`. Never fails; unrecognised addresses are `Unknown`.
    fn classify(&self, email: &str) -> UserRole;
}

/// The part of an email address before the first `@`.
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

/// Matches the local-part against a student pattern, then a teacher pattern.
#[derive(Debug, Clone)]
pub struct PatternRoleClassifier {
    student: Regex,
    teacher: Regex,
}

impl PatternRoleClassifier {
    /// Compile the configured patterns.
    pub fn new(config: &RolePatternConfig) -> Result<Self, AppError> {
        let compile = |pattern: &str, which: &str| {
            Regex::new(pattern).map_err(|e| {
                AppError::configuration(format!("Invalid {which} role pattern '{pattern}': {e}"))
            })
        };
        Ok(Self {
            student: compile(&config.student_pattern, "student")?,
            teacher: compile(&config.teacher_pattern, "teacher")?,
        })
    }
}

impl RoleClassifier for PatternRoleClassifier {
    fn classify(&self, email: &str) -> UserRole {
        let account = local_part(email);
        if self.student.is_match(account) {
            UserRole::Student
        } else if self.teacher.is_match(account) {
            UserRole::Teacher
        } else {
            UserRole::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PatternRoleClassifier {
        PatternRoleClassifier::new(&RolePatternConfig::default()).unwrap()
    }

    #[test]
    fn test_default_patterns() {
        let c = classifier();
        assert_eq!(c.classify("2024P001@example.ac.jp"), UserRole::Student);
        assert_eq!(c.classify("yamada-taro@example.ac.jp"), UserRole::Teacher);
        assert_eq!(c.classify("suzuki@example.ac.jp"), UserRole::Teacher);
        assert_eq!(c.classify("x1y2@example.ac.jp"), UserRole::Unknown);
    }

    #[test]
    fn test_edge_shapes() {
        let c = classifier();
        assert_eq!(c.classify("2024p001@example.ac.jp"), UserRole::Unknown);
        assert_eq!(c.classify("-yamada@example.ac.jp"), UserRole::Unknown);
        assert_eq!(c.classify("yamada--taro@example.ac.jp"), UserRole::Unknown);
        assert_eq!(c.classify("Yamada@example.ac.jp"), UserRole::Unknown);
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("a@b@c"), "a");
        assert_eq!(local_part("nodomain"), "nodomain");
    }

    #[test]
    fn test_custom_patterns() {
        let c = PatternRoleClassifier::new(&RolePatternConfig {
            student_pattern: r"^s\d+$".into(),
            teacher_pattern: r"^t\d+$".into(),
        })
        .unwrap();
        assert_eq!(c.classify("s123@x"), UserRole::Student);
        assert_eq!(c.classify("t9@x"), UserRole::Teacher);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternRoleClassifier::new(&RolePatternConfig {
            student_pattern: "(".into(),
            teacher_pattern: "^x$".into(),
        })
        .unwrap_err();
        assert_eq!(err.kind, portal_core::error::ErrorKind::Configuration);
    }
}
