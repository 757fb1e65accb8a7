//! Error taxonomy of the authorization core.
//!
//! Every variant below is an *expected* outcome that the controller layer
//! translates into a transport response; none is fatal. Infrastructure
//! failures are carried opaquely in [`AuthError::Internal`] and are not
//! retried here.

use thiserror::Error;

/// Result type used across the authorization core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Expected failure outcomes of the authentication/authorization surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed input: password mismatch, weak password, invalid role, etc.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An account with the requested email already exists.
    #[error("email is already registered")]
    Conflict,

    /// Bad credentials, malformed/forged/expired token, or unknown subject.
    ///
    /// Deliberately coarse: callers (and users) must not be able to tell
    /// *which* check failed.
    #[error("invalid email or password")]
    Authentication,

    /// Authenticated, but the role or ownership requirement is not met.
    #[error("forbidden: {0}")]
    Authorization(String),

    /// The resource is absent, or deliberately hidden from this caller.
    #[error("not found")]
    NotFound,

    /// Opaque infrastructure failure (store unavailable, signing failure).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
