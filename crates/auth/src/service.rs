//! Authentication orchestration: sign-up, login, session checks, resets.
//!
//! Stateless over the identity store; nothing is retained between calls.

use chrono::Utc;

use opencampus_core::IdentityId;

use crate::error::AuthError;
use crate::hasher::CredentialHasher;
use crate::identity::{Identity, IdentityProfile};
use crate::roles::Role;
use crate::store::{IdentityStore, StoreError};
use crate::token::{Hs256TokenIssuer, TokenVerifier};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Self-service account request.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub requested_role: Role,
}

/// Successful sign-up/login result: the sanitized identity plus a signed
/// session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: IdentityProfile,
    pub token: String,
}

/// Authentication service over an identity store.
pub struct AuthService<S> {
    store: S,
    hasher: CredentialHasher,
    issuer: Hs256TokenIssuer,
}

impl<S: IdentityStore> AuthService<S> {
    pub fn new(store: S, hasher: CredentialHasher, issuer: Hs256TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    /// Create an account and start a session.
    ///
    /// All input validation happens before the store is touched; a
    /// mismatched confirmation can never cause a write. Duplicate emails
    /// are detected by the store's unique constraint on the single insert,
    /// not by a racy pre-check.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthSession, AuthError> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(AuthError::validation("display name cannot be empty"));
        }

        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::validation("invalid email format"));
        }

        validate_password(&request.password)?;
        if request.password != request.confirm_password {
            return Err(AuthError::validation("passwords do not match"));
        }

        if !request.requested_role.self_service() {
            return Err(AuthError::validation(format!(
                "role '{}' cannot be requested at sign-up",
                request.requested_role
            )));
        }

        let password_secret = self
            .hasher
            .hash(&request.password)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::new(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role: request.requested_role,
            password_secret,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(identity.clone()).await.map_err(|e| match e {
            StoreError::DuplicateEmail => AuthError::Conflict,
            other => AuthError::internal(other.to_string()),
        })?;

        tracing::info!(identity_id = %identity.id, role = %identity.role, "account created");

        self.session_for(identity.profile())
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password produce the same error; callers
    /// must not learn which check failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let identity = self
            .store
            .find_by_email(email.trim())
            .await
            .map_err(infrastructure)?;

        let Some(identity) = identity else {
            tracing::info!("login rejected");
            return Err(AuthError::Authentication);
        };

        if !self.hasher.verify(password, &identity.password_secret) {
            tracing::info!(identity_id = %identity.id, "login rejected");
            return Err(AuthError::Authentication);
        }

        self.session_for(identity.profile())
    }

    /// Resolve a session token to its (sanitized) identity.
    ///
    /// A valid token whose subject has since been removed from the store
    /// fails exactly like a bad token.
    pub async fn who_am_i(&self, token: &str) -> Result<IdentityProfile, AuthError> {
        let claims = self.issuer.verify(token, Utc::now())?;

        let identity = self
            .store
            .find_by_id(claims.sub)
            .await
            .map_err(infrastructure)?
            .ok_or(AuthError::Authentication)?;

        Ok(identity.profile())
    }

    /// Administrative password reset.
    ///
    /// Previously issued tokens for the target stay valid until their
    /// natural expiry; there is no server-side revocation.
    pub async fn reset_password(
        &self,
        acting_token: &str,
        target: IdentityId,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let claims = self.issuer.verify(acting_token, Utc::now())?;
        if claims.role != Role::Admin {
            return Err(AuthError::forbidden("password reset requires the admin role"));
        }

        validate_password(new_password)?;

        let mut identity = self
            .store
            .find_by_id(target)
            .await
            .map_err(infrastructure)?
            .ok_or_else(|| AuthError::validation("unknown target account"))?;

        identity.password_secret = self
            .hasher
            .hash(new_password)
            .map_err(|e| AuthError::internal(e.to_string()))?;
        identity.updated_at = Utc::now();

        self.store.update(identity).await.map_err(|e| match e {
            StoreError::NotFound => AuthError::validation("unknown target account"),
            other => AuthError::internal(other.to_string()),
        })?;

        tracing::info!(identity_id = %target, "password reset");
        Ok(())
    }

    /// Update the caller's own display name (the one self-service profile
    /// mutation).
    pub async fn update_display_name(
        &self,
        token: &str,
        new_name: &str,
    ) -> Result<IdentityProfile, AuthError> {
        let claims = self.issuer.verify(token, Utc::now())?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AuthError::validation("display name cannot be empty"));
        }

        let mut identity = self
            .store
            .find_by_id(claims.sub)
            .await
            .map_err(infrastructure)?
            .ok_or(AuthError::Authentication)?;

        identity.display_name = new_name.to_string();
        identity.updated_at = Utc::now();

        let profile = identity.profile();
        self.store.update(identity).await.map_err(infrastructure)?;

        Ok(profile)
    }

    fn session_for(&self, identity: IdentityProfile) -> Result<AuthSession, AuthError> {
        let token = self.issuer.issue(&identity, Utc::now())?;
        Ok(AuthSession { identity, token })
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::validation("password cannot be empty"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn infrastructure(e: StoreError) -> AuthError {
    AuthError::internal(e.to_string())
}
