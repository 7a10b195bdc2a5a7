//! Identity provider token verification and the allowed-domain policy.

pub mod domain;
pub mod verifier;

pub use domain::DomainPolicy;
pub use verifier::{IdentityVerifier, JwtIdentityVerifier, VerifiedIdentity};
