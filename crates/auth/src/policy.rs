//! Per-action access policy table.
//!
//! Role requirements are plain data: one row per platform action, looked up
//! by the gate at request time. Adding an action means adding a row here and
//! nothing else.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Every access-controlled platform operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateCourse,
    UpdateCourse,
    DeleteCourse,
    UploadLessonVideo,
    ListUsers,
    ResetUserPassword,
    Enroll,
    UpdateEnrollmentProgress,
    PlayLesson,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateCourse => "create_course",
            Action::UpdateCourse => "update_course",
            Action::DeleteCourse => "delete_course",
            Action::UploadLessonVideo => "upload_lesson_video",
            Action::ListUsers => "list_users",
            Action::ResetUserPassword => "reset_user_password",
            Action::Enroll => "enroll",
            Action::UpdateEnrollmentProgress => "update_enrollment_progress",
            Action::PlayLesson => "play_lesson",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check applied after the role requirement passes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessCheck {
    /// Role membership alone decides.
    RoleOnly,

    /// The caller must own the target resource.
    OwnedResource,

    /// Lesson playback: staff always pass; students need an enrollment on
    /// the lesson's course unless the lesson is a preview.
    EnrolledOrStaff,
}

/// Access policy of one action.
#[derive(Debug, Copy, Clone)]
pub struct Policy {
    pub roles: &'static [Role],
    pub check: AccessCheck,
}

/// The policy table.
pub fn policy(action: Action) -> Policy {
    use AccessCheck::{EnrolledOrStaff, OwnedResource, RoleOnly};
    use Role::{Admin, Instructor, Student};

    match action {
        Action::CreateCourse => Policy { roles: &[Instructor], check: RoleOnly },
        Action::UpdateCourse => Policy { roles: &[Instructor], check: OwnedResource },
        Action::DeleteCourse => Policy { roles: &[Instructor], check: OwnedResource },
        Action::UploadLessonVideo => Policy { roles: &[Instructor], check: OwnedResource },
        Action::ListUsers => Policy { roles: &[Admin], check: RoleOnly },
        Action::ResetUserPassword => Policy { roles: &[Admin], check: RoleOnly },
        Action::Enroll => Policy { roles: &[Student], check: RoleOnly },
        Action::UpdateEnrollmentProgress => Policy { roles: &[Student], check: OwnedResource },
        Action::PlayLesson => Policy {
            roles: &[Student, Instructor, Admin],
            check: EnrolledOrStaff,
        },
    }
}
