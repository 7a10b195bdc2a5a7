//! Sign-in flow: verify, enforce domain, classify, upsert, open session.

use std::sync::Arc;

use tracing::{info, warn};

use portal_auth::identity::{DomainPolicy, IdentityVerifier};
use portal_auth::role::RoleClassifier;
use portal_auth::session::{IssuedSession, SessionManager, SessionRecord};
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::UserRepository;
use portal_entity::user::{ProfileUpsert, UserProfile};

use crate::context::RequestContext;

/// Outcome of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResult {
    /// Session token and record.
    pub issued: IssuedSession,
    /// The stored profile after the upsert.
    pub user: UserProfile,
}

/// Handles the identity side of the portal.
#[derive(Debug, Clone)]
pub struct AuthService {
    verifier: Arc<dyn IdentityVerifier>,
    classifier: Arc<dyn RoleClassifier>,
    domain: DomainPolicy,
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        classifier: Arc<dyn RoleClassifier>,
        domain: DomainPolicy,
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            verifier,
            classifier,
            domain,
            users,
            sessions,
        }
    }

    /// Exchange an identity provider ID token for a portal session.
    ///
    /// A foreign-domain address ends the attempt: the provider session is
    /// revoked, nothing is stored, and no portal session is opened.
    pub async fn sign_in(&self, id_token: &str) -> AppResult<SignInResult> {
        let identity = self.verifier.verify(id_token).await?;

        if let Err(rejection) = self.domain.check(&identity.email) {
            warn!(uid = %identity.uid, email = %identity.email, "Sign-in from disallowed domain");
            if let Err(e) = self.verifier.revoke(&identity).await {
                warn!(uid = %identity.uid, error = %e, "Failed to revoke provider session");
            }
            return Err(rejection);
        }

        let role = self.classifier.classify(&identity.email);
        let user = self
            .users
            .upsert(ProfileUpsert {
                id: identity.uid,
                email: identity.email,
                role,
                display_name: identity.display_name,
            })
            .await?;

        let issued = self.sessions.open(&user)?;
        info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(SignInResult { issued, user })
    }

    /// Resolve a bearer token to its session.
    pub fn authenticate(&self, token: &str) -> AppResult<SessionRecord> {
        self.sessions.authenticate(token)
    }

    /// End the caller's session.
    pub fn sign_out(&self, ctx: &RequestContext) {
        self.sessions.close(ctx.session_id);
    }

    /// The caller's stored profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<UserProfile> {
        self.users
            .find_by_id(&ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User profile not found"))
    }
}
