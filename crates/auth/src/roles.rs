//! Platform roles.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Role of an identity. This is a closed set; there is no free-form role
/// string anywhere in the platform.
///
/// The canonical wire/storage form is lowercase ("student", "instructor",
/// "admin"). Parsing anything else is an explicit error: unrecognized
/// roles are rejected, never silently downgraded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Whether the role may be requested at self-service sign-up.
    ///
    /// Admin accounts are provisioned administratively, never self-service.
    pub fn self_service(&self) -> bool {
        matches!(self, Role::Student | Role::Instructor)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::validation(format!("unknown role: {other:?}"))),
        }
    }
}
