//! Identity records and their sanitized public view.
//!
//! # Invariants
//! - `CredentialSecret` is produced only by the hasher and never serializes.
//! - Everything returned across the public surface is an [`IdentityProfile`];
//!   the full [`Identity`] stays between the service and the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opencampus_core::IdentityId;

use crate::roles::Role;

/// Stored credential secret (`<algorithm-tag>$<salt-hex>$<digest-hex>`).
///
/// Opaque to everything except the hasher. Deliberately implements neither
/// `Serialize` nor `Deserialize`, so it cannot cross a JSON boundary, and
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSecret(String);

impl CredentialSecret {
    /// Wrap an already-encoded secret (e.g. loaded from the store).
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for CredentialSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CredentialSecret(<redacted>)")
    }
}

/// A user account record as the identity store holds it.
///
/// Mutated only by the authentication service; never hard-deleted here.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub password_secret: CredentialSecret,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// The sanitized view that may leave this crate.
    pub fn profile(&self) -> IdentityProfile {
        IdentityProfile {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Public identity view: everything except the credential secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub id: IdentityId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        let now = Utc::now();
        Identity {
            id: IdentityId::new(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            role: Role::Student,
            password_secret: CredentialSecret::from_encoded("argon2id$00$00"),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn profile_drops_the_secret() {
        let identity = identity();
        let json = serde_json::to_value(identity.profile()).unwrap();
        let fields: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(!fields.iter().any(|f| f.contains("password") || f.contains("secret")));
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let identity = identity();
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("argon2id$"));
        assert!(rendered.contains("<redacted>"));
    }
}
