//! Role derivation from email addresses.

pub mod classifier;

pub use classifier::{PatternRoleClassifier, RoleClassifier, local_part};
