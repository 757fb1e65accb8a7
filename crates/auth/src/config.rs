//! Environment-driven configuration for the authorization core.

use chrono::Duration;

/// Runtime configuration: signing secret and session lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret shared by issue and verify.
    pub jwt_secret: String,

    /// Fixed session TTL; expiry is the only way a session ends.
    pub session_ttl: Duration,
}

impl AuthConfig {
    pub const DEFAULT_TTL_MINUTES: i64 = 60;

    pub fn new(jwt_secret: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            session_ttl,
        }
    }

    /// Read configuration from `JWT_SECRET` and `SESSION_TTL_MINUTES`.
    ///
    /// Missing or unparsable values fall back to dev defaults; the secret
    /// fallback is logged loudly because it must never reach production.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let ttl_minutes = std::env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(Self::DEFAULT_TTL_MINUTES);

        Self {
            jwt_secret,
            session_ttl: Duration::minutes(ttl_minutes),
        }
    }
}
