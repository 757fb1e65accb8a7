//! `opencampus-auth` — authentication/authorization core for the learning platform.
//!
//! This crate is intentionally decoupled from HTTP and storage: controllers
//! hand it credentials/tokens, storage collaborators implement the store
//! contracts, and everything in between (hashing, token issuance, role and
//! ownership checks) lives here.

pub mod claims;
pub mod config;
pub mod error;
pub mod gate;
pub mod hasher;
pub mod identity;
pub mod policy;
pub mod roles;
pub mod service;
pub mod store;
pub mod token;

pub use claims::{Claims, TokenValidationError, validate_claims};
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use gate::{AccessControl, Gate, LessonAccess, ResourceDescriptor};
pub use hasher::{CredentialHasher, HashError};
pub use identity::{CredentialSecret, Identity, IdentityProfile};
pub use policy::{AccessCheck, Action, Policy, policy};
pub use roles::Role;
pub use service::{AuthService, AuthSession, SignUpRequest};
pub use store::{IdentityStore, ResourceStore, StoreError};
pub use token::{Hs256TokenIssuer, TokenVerifier};
