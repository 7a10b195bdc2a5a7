//! Offline role lookup for an email address.

use clap::Args;

use portal_auth::role::{PatternRoleClassifier, RoleClassifier};
use portal_core::config::RolePatternConfig;
use portal_core::result::AppResult;

use crate::output;

/// Arguments for the role command
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Email address to classify
    pub email: String,

    /// Override the student local-part pattern
    #[arg(long)]
    pub student_pattern: Option<String>,

    /// Override the teacher local-part pattern
    #[arg(long)]
    pub teacher_pattern: Option<String>,
}

/// Print the role the default classifier assigns.
pub fn execute(args: &RoleArgs) -> AppResult<()> {
    let defaults = RolePatternConfig::default();
    let config = RolePatternConfig {
        student_pattern: args
            .student_pattern
            .clone()
            .unwrap_or(defaults.student_pattern),
        teacher_pattern: args
            .teacher_pattern
            .clone()
            .unwrap_or(defaults.teacher_pattern),
    };
    let classifier = PatternRoleClassifier::new(&config)?;

    output::print_kv(&args.email, classifier.classify(&args.email).as_str());
    Ok(())
}
