//! HS256 session token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{Claims, validate_claims};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::IdentityProfile;

/// Verification side of the session token contract.
///
/// Object-safe so transport layers can hold an `Arc<dyn TokenVerifier>`.
/// Every failure mode (bad signature, malformed token, expired) collapses
/// into the same [`AuthError::Authentication`]; callers only learn
/// "authenticated or not".
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError>;
}

/// Issues and verifies HS256-signed session tokens.
pub struct Hs256TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl Hs256TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked deterministically in `validate_claims` against
        // the caller-supplied clock, not against the library's wall clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.session_ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a signed token for an identity.
    ///
    /// Claim shape is deterministic (`iat = now`, `exp = now + ttl`); the
    /// signature varies with `now`.
    pub fn issue(
        &self,
        identity: &IdentityProfile,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: identity.id,
            email: identity.email.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::internal(format!("token signing failed: {e}")))
    }
}

impl TokenVerifier for Hs256TokenIssuer {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::Authentication)?;

        validate_claims(&data.claims, now).map_err(|_| AuthError::Authentication)?;

        Ok(data.claims)
    }
}
