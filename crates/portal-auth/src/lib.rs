//! # portal-auth
//!
//! Who may use the portal and as what.
//!
//! ## Modules
//!
//! - `identity`: verification of identity provider ID tokens and the
//!   allowed-domain policy
//! - `role`: email local-part → [`UserRole`](portal_entity::user::UserRole)
//! - `jwt`: portal session token signing and validation
//! - `session`: server-side session lifecycle
//! - `gate`: the client-side `loading → authenticated | unauthenticated`
//!   state machine

pub mod gate;
pub mod identity;
pub mod jwt;
pub mod role;
pub mod session;

pub use gate::{GateState, Navigation, RouteAccess, SessionGate};
pub use identity::{DomainPolicy, IdentityVerifier, JwtIdentityVerifier, VerifiedIdentity};
pub use jwt::{SessionClaims, SessionTokenDecoder, SessionTokenEncoder};
pub use role::{PatternRoleClassifier, RoleClassifier};
pub use session::{IssuedSession, SessionManager, SessionRecord, SessionStore};
