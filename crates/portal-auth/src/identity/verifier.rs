//! ID token verification.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::info;

use portal_core::config::IdentityConfig;
use portal_core::error::AppError;
use portal_core::result::AppResult;

/// Who the identity provider says the caller is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider subject id, used as the portal user id.
    pub uid: String,
    /// Email address.
    pub email: String,
    /// Display name, if the provider shared one.
    pub display_name: Option<String>,
    /// Issued-at of the presented token.
    pub issued_at: i64,
    /// Expiry of the presented token.
    pub expires_at: i64,
}

/// Verifies identity provider tokens.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + std::fmt::Debug {
    /// Check the token's signature, issuer, audience, and expiry.
    async fn verify(&self, id_token: &str) -> AppResult<VerifiedIdentity>;

    /// Refuse any further use of this identity's provider session.
    async fn revoke(&self, identity: &VerifiedIdentity) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    #[serde(default)]
    iat: i64,
    exp: i64,
}

/// Verifies signed JWT ID tokens locally with a configured key.
///
/// Revoked provider sessions are remembered until their token expires.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    revoked: DashMap<String, i64>,
}

impl std::fmt::Debug for JwtIdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityVerifier")
            .field("validation", &self.validation)
            .field("revoked", &self.revoked.len())
            .finish()
    }
}

impl JwtIdentityVerifier {
    /// Build a verifier from configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let (algorithm, decoding_key) = match config.algorithm.to_uppercase().as_str() {
            "HS256" => (
                Algorithm::HS256,
                DecodingKey::from_secret(config.verification_key.as_bytes()),
            ),
            "RS256" => (
                Algorithm::RS256,
                DecodingKey::from_rsa_pem(config.verification_key.as_bytes()).map_err(|e| {
                    AppError::configuration(format!("Invalid identity verification key: {e}"))
                })?,
            ),
            other => {
                return Err(AppError::configuration(format!(
                    "Unsupported identity token algorithm: {other}"
                )));
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 5;

        Ok(Self {
            decoding_key,
            validation,
            revoked: DashMap::new(),
        })
    }

    fn revocation_key(uid: &str, issued_at: i64) -> String {
        format!("{uid}:{issued_at}")
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<VerifiedIdentity> {
        let data = decode::<IdTokenClaims>(id_token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("ID token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    AppError::authentication("ID token was not issued for this portal")
                }
                _ => AppError::authentication(format!("Invalid ID token: {e}")),
            })?;

        let claims = data.claims;
        if self
            .revoked
            .contains_key(&Self::revocation_key(&claims.sub, claims.iat))
        {
            return Err(AppError::authentication("ID token has been revoked"));
        }

        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::authentication("ID token carries no email address"))?;

        Ok(VerifiedIdentity {
            uid: claims.sub,
            email,
            display_name: claims.name,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    async fn revoke(&self, identity: &VerifiedIdentity) -> AppResult<()> {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp > now);
        self.revoked.insert(
            Self::revocation_key(&identity.uid, identity.issued_at),
            identity.expires_at,
        );
        info!(uid = %identity.uid, "Revoked provider session");
        Ok(())
    }
}
