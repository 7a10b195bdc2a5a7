//! Identity, session, and role configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The only email domain allowed to sign in (e.g. `example.ac.jp`).
    #[serde(default)]
    pub allowed_domain: String,
    /// Secret key for signing portal session tokens (HMAC-SHA256).
    #[serde(default = "default_session_secret")]
    pub session_secret: String,
    /// Session lifetime in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Identity provider token verification.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Email local-part patterns used to derive roles.
    #[serde(default)]
    pub roles: RolePatternConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: String::new(),
            session_secret: default_session_secret(),
            session_ttl_hours: default_session_ttl(),
            identity: IdentityConfig::default(),
            roles: RolePatternConfig::default(),
        }
    }
}

/// How ID tokens from the identity provider are verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Expected `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Expected `aud` claim (the OAuth client id).
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Signing algorithm: `HS256` or `RS256`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Shared secret for HS256, or PEM-encoded public key for RS256.
    #[serde(default = "default_identity_key")]
    pub verification_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            audience: default_audience(),
            algorithm: default_algorithm(),
            verification_key: default_identity_key(),
        }
    }
}

/// Regular expressions matched against the email local-part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePatternConfig {
    /// Local-parts matching this pattern are students.
    #[serde(default = "default_student_pattern")]
    pub student_pattern: String,
    /// Local-parts matching this pattern are teachers.
    #[serde(default = "default_teacher_pattern")]
    pub teacher_pattern: String,
}

impl Default for RolePatternConfig {
    fn default() -> Self {
        Self {
            student_pattern: default_student_pattern(),
            teacher_pattern: default_teacher_pattern(),
        }
    }
}

fn default_session_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_session_ttl() -> u64 {
    12
}

fn default_issuer() -> String {
    "https://accounts.google.com".to_string()
}

fn default_audience() -> String {
    "lecture-portal".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_identity_key() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_student_pattern() -> String {
    r"^\d{4}P\d+$".to_string()
}

fn default_teacher_pattern() -> String {
    r"^[a-z]+(-[a-z]+)*$".to_string()
}
