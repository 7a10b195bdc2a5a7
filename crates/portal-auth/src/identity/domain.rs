//! Allowed email domain policy.

use portal_core::error::AppError;

/// Only addresses ending in `@<domain>` may sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPolicy {
    domain: String,
    suffix: String,
}

impl DomainPolicy {
    /// Create a policy for `domain` (without the `@`).
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            suffix: format!("@{domain}"),
        }
    }

    /// The allowed domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether `email` belongs to the allowed domain. Case-sensitive.
    pub fn allows(&self, email: &str) -> bool {
        email.ends_with(&self.suffix) && email.len() > self.suffix.len()
    }

    /// Fail with the user-facing rejection unless `email` is allowed.
    pub fn check(&self, email: &str) -> Result<(), AppError> {
        if self.allows(email) {
            Ok(())
        } else {
            Err(AppError::authorization(self.rejection_message()))
        }
    }

    /// Message shown to someone who signed in with a foreign address.
    pub fn rejection_message(&self) -> String {
        format!("Please sign in with an @{} email address.", self.domain)
    }
}
