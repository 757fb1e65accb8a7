//! Per-request authorization decisions.
//!
//! The gate is a pure decision function of (claims, action, resource facts):
//! it holds no state between requests, and claims arrive as an explicit
//! parameter, never through ambient request-scoped globals.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use opencampus_core::{CourseId, IdentityId, LessonId, ResourceId};

use crate::claims::Claims;
use crate::error::AuthError;
use crate::policy::{AccessCheck, Action, policy};
use crate::roles::Role;
use crate::store::ResourceStore;
use crate::token::TokenVerifier;

/// Target of an access-checked operation, supplied by the resource
/// collaborators alongside the request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceDescriptor {
    Course { id: CourseId },
    Lesson(LessonAccess),
    Enrollment { id: ResourceId },
}

/// Playback-relevant lesson facts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonAccess {
    pub id: LessonId,
    pub course_id: CourseId,
    /// Preview lessons are playable without an enrollment.
    pub preview: bool,
}

impl ResourceDescriptor {
    fn resource_id(&self) -> ResourceId {
        match self {
            ResourceDescriptor::Course { id } => (*id).into(),
            ResourceDescriptor::Lesson(lesson) => lesson.id.into(),
            ResourceDescriptor::Enrollment { id } => *id,
        }
    }
}

/// Role/ownership/enrollment gate over the resource-fact store.
pub struct Gate<R> {
    resources: R,
}

impl<R: ResourceStore> Gate<R> {
    pub fn new(resources: R) -> Self {
        Self { resources }
    }

    /// Decide whether `claims` may perform `action` on `resource`.
    ///
    /// Checks run in order: role membership, then whatever per-action check
    /// the policy table declares. Ownership facts are looked up fresh on
    /// every call.
    pub async fn authorize(
        &self,
        claims: &Claims,
        action: Action,
        resource: Option<&ResourceDescriptor>,
    ) -> Result<(), AuthError> {
        let policy = policy(action);

        if !policy.roles.contains(&claims.role) {
            tracing::info!(%action, role = %claims.role, "denied: role not permitted");
            return Err(AuthError::forbidden(format!(
                "action '{action}' requires one of: {}",
                policy
                    .roles
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        match policy.check {
            AccessCheck::RoleOnly => Ok(()),
            AccessCheck::OwnedResource => {
                let descriptor = required(resource, action)?;
                self.check_ownership(claims.sub, descriptor, action).await
            }
            AccessCheck::EnrolledOrStaff => {
                let descriptor = required(resource, action)?;
                let ResourceDescriptor::Lesson(lesson) = descriptor else {
                    return Err(AuthError::validation(format!(
                        "action '{action}' targets a lesson"
                    )));
                };
                self.check_playback(claims, lesson).await
            }
        }
    }

    async fn check_ownership(
        &self,
        subject: IdentityId,
        descriptor: &ResourceDescriptor,
        action: Action,
    ) -> Result<(), AuthError> {
        let owner = self
            .resources
            .resource_owner(descriptor.resource_id())
            .await
            .map_err(|e| AuthError::internal(e.to_string()))?;

        match owner {
            None => Err(AuthError::NotFound),
            Some(owner) if owner == subject => Ok(()),
            Some(_) => {
                tracing::info!(%action, %subject, "denied: not the owner");
                Err(AuthError::forbidden("not yours"))
            }
        }
    }

    /// Enrollment-gated content rule.
    ///
    /// Denial is `NotFound`, not `Authorization`: a caller without access
    /// must not learn that the lesson exists.
    async fn check_playback(
        &self,
        claims: &Claims,
        lesson: &LessonAccess,
    ) -> Result<(), AuthError> {
        if lesson.preview {
            return Ok(());
        }
        if matches!(claims.role, Role::Instructor | Role::Admin) {
            return Ok(());
        }

        let enrolled = self
            .resources
            .is_enrolled(claims.sub, lesson.course_id)
            .await
            .map_err(|e| AuthError::internal(e.to_string()))?;

        if enrolled { Ok(()) } else { Err(AuthError::NotFound) }
    }
}

fn required<'d>(
    resource: Option<&'d ResourceDescriptor>,
    action: Action,
) -> Result<&'d ResourceDescriptor, AuthError> {
    resource.ok_or_else(|| {
        AuthError::validation(format!("action '{action}' requires a resource descriptor"))
    })
}

/// Transport-facing composition: token verification followed by the gate.
///
/// Returns the verified claims on success so controllers can thread them
/// through the rest of the request.
pub struct AccessControl<R> {
    verifier: Arc<dyn TokenVerifier>,
    gate: Gate<R>,
}

impl<R: ResourceStore> AccessControl<R> {
    pub fn new(verifier: Arc<dyn TokenVerifier>, resources: R) -> Self {
        Self {
            verifier,
            gate: Gate::new(resources),
        }
    }

    pub async fn authorize(
        &self,
        token: &str,
        action: Action,
        resource: Option<&ResourceDescriptor>,
    ) -> Result<Claims, AuthError> {
        let claims = self.verifier.verify(token, Utc::now())?;
        self.gate.authorize(&claims, action, resource).await?;
        Ok(claims)
    }
}
