//! Session token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use portal_core::error::AppError;

use super::claims::SessionClaims;

/// Validates session tokens signed by [`SessionTokenEncoder`](super::SessionTokenEncoder).
#[derive(Clone)]
pub struct SessionTokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionTokenDecoder {
    /// Create a decoder for `secret`.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry and return the claims.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Session has expired")
                }
                _ => AppError::authentication("Invalid session token"),
            })
    }
}
