//! Store contracts owned by the excluded storage collaborators.
//!
//! The authorization core never talks to a database; it talks to these
//! traits. The storage layer is the sole enforcement point for email
//! uniqueness: `insert` must be a single atomic operation that surfaces a
//! duplicate as [`StoreError::DuplicateEmail`] (no check-then-insert race
//! in this core).

use async_trait::async_trait;
use thiserror::Error;

use opencampus_core::{CourseId, IdentityId, ResourceId};

use crate::identity::Identity;

/// Storage-layer failure surfaced to the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The unique-email constraint rejected an insert.
    #[error("email is already registered")]
    DuplicateEmail,

    /// An update targeted a record that does not exist.
    #[error("record not found")]
    NotFound,

    /// Opaque infrastructure failure (connection loss, timeout, ...).
    /// Not retried by the core; retry policy belongs to the adapter.
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// User-record store contract.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Exact-match lookup by email (the store decides case semantics).
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError>;

    /// Atomic insert; duplicates fail with [`StoreError::DuplicateEmail`].
    async fn insert(&self, identity: Identity) -> Result<(), StoreError>;

    async fn update(&self, identity: Identity) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> IdentityStore for std::sync::Arc<S>
where
    S: IdentityStore + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, identity: Identity) -> Result<(), StoreError> {
        (**self).insert(identity).await
    }

    async fn update(&self, identity: Identity) -> Result<(), StoreError> {
        (**self).update(identity).await
    }
}

/// Course/lesson/enrollment fact store contract used by the gate.
///
/// Ownership is an explicit query, never an entity-graph walk, so the gate
/// has no dependency on any particular storage shape. Facts are evaluated
/// per request and never cached here.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Owner (creator/holder) of a resource, if the resource exists.
    async fn resource_owner(&self, resource: ResourceId)
    -> Result<Option<IdentityId>, StoreError>;

    /// Whether an enrollment record links the student to the course.
    async fn is_enrolled(&self, student: IdentityId, course: CourseId)
    -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> ResourceStore for std::sync::Arc<S>
where
    S: ResourceStore + ?Sized,
{
    async fn resource_owner(
        &self,
        resource: ResourceId,
    ) -> Result<Option<IdentityId>, StoreError> {
        (**self).resource_owner(resource).await
    }

    async fn is_enrolled(
        &self,
        student: IdentityId,
        course: CourseId,
    ) -> Result<bool, StoreError> {
        (**self).is_enrolled(student, course).await
    }
}
