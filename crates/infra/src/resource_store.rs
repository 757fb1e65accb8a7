//! In-memory course/lesson/enrollment fact store for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use opencampus_auth::{ResourceStore, StoreError};
use opencampus_core::{CourseId, IdentityId, ResourceId};

/// Registered ownership facts plus enrollment pairs.
///
/// The catalog/enrollment collaborators own these facts in production;
/// tests register them directly.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    owners: RwLock<HashMap<ResourceId, IdentityId>>,
    enrollments: RwLock<HashSet<(IdentityId, CourseId)>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the owner of a resource (course, lesson, enrollment row).
    pub fn set_owner(&self, resource: impl Into<ResourceId>, owner: IdentityId) {
        if let Ok(mut owners) = self.owners.write() {
            owners.insert(resource.into(), owner);
        }
    }

    /// Record an enrollment linking a student to a course.
    pub fn enroll(&self, student: IdentityId, course: CourseId) {
        if let Ok(mut enrollments) = self.enrollments.write() {
            enrollments.insert((student, course));
        }
    }

    /// Drop an enrollment (withdrawal).
    pub fn withdraw(&self, student: IdentityId, course: CourseId) {
        if let Ok(mut enrollments) = self.enrollments.write() {
            enrollments.remove(&(student, course));
        }
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn resource_owner(
        &self,
        resource: ResourceId,
    ) -> Result<Option<IdentityId>, StoreError> {
        let owners = self
            .owners
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(owners.get(&resource).copied())
    }

    async fn is_enrolled(
        &self,
        student: IdentityId,
        course: CourseId,
    ) -> Result<bool, StoreError> {
        let enrollments = self
            .enrollments
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(enrollments.contains(&(student, course)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn owner_facts_round_trip() {
        let store = InMemoryResourceStore::new();
        let course = CourseId::new();
        let owner = IdentityId::new();

        assert_eq!(store.resource_owner(course.into()).await.unwrap(), None);

        store.set_owner(course, owner);
        assert_eq!(store.resource_owner(course.into()).await.unwrap(), Some(owner));
    }

    #[tokio::test]
    async fn enrollment_facts_can_be_withdrawn() {
        let store = InMemoryResourceStore::new();
        let student = IdentityId::new();
        let course = CourseId::new();

        assert!(!store.is_enrolled(student, course).await.unwrap());

        store.enroll(student, course);
        assert!(store.is_enrolled(student, course).await.unwrap());

        store.withdraw(student, course);
        assert!(!store.is_enrolled(student, course).await.unwrap());
    }
}
