// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// Identity roles.
///
/// Every identity carries exactly one role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages locations, supervisors, employees, approvals, and exports.
    Admin,
    /// Marks attendance and manages employees at one location.
    Supervisor,
}

impl Role {
    /// Returns the stored string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
        }
    }

    /// Returns the landing page for this role.
    #[must_use]
    pub const fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Supervisor => "/supervisor/dashboard",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employee lifecycle status.
///
/// Employees are created `Pending`. Only an admin review moves them to
/// `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Pending,
    Approved,
    Rejected,
}

impl EmployeeStatus {
    /// Returns the stored string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for EmployeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidEmployeeStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presence recorded for one employee on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Returns the stored string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }

    /// Maps a checkbox state to a presence status.
    #[must_use]
    pub const fn from_presence(is_present: bool) -> Self {
        if is_present {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            _ => Err(DomainError::InvalidAttendanceStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An admin decision on a pending employee.
///
/// Unknown action strings do not parse; callers treat them as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Reject,
}

impl ReviewAction {
    /// Parses an action path segment.
    ///
    /// # Returns
    ///
    /// `None` for anything other than `accept` or `reject`.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    /// The lifecycle status this action produces.
    #[must_use]
    pub const fn target_status(&self) -> EmployeeStatus {
        match self {
            Self::Accept => EmployeeStatus::Approved,
            Self::Reject => EmployeeStatus::Rejected,
        }
    }
}

/// File extensions accepted for uploaded documents.
pub const ALLOWED_DOCUMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// The four document slots carried by supervisor and employee profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Profile,
    Aadhaar,
    Pan,
    Passbook,
}

impl DocumentKind {
    /// All document slots in form order.
    pub const ALL: [Self; 4] = [Self::Profile, Self::Aadhaar, Self::Pan, Self::Passbook];

    /// The multipart form field carrying this document.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Profile => "profile_image",
            Self::Aadhaar => "aadhaar_image",
            Self::Pan => "pan_image",
            Self::Passbook => "passbook_image",
        }
    }

    /// File stem prefix used for deterministically named documents.
    #[must_use]
    pub const fn stem(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Aadhaar => "aadhaar",
            Self::Pan => "pan",
            Self::Passbook => "passbook",
        }
    }

    /// Directory (under the upload root) for deterministically named documents.
    #[must_use]
    pub const fn deterministic_dir(&self) -> &'static str {
        match self {
            Self::Profile => "profiles",
            Self::Aadhaar | Self::Pan | Self::Passbook => "documents",
        }
    }

    /// Checks whether a file name carries an accepted image extension.
    #[must_use]
    pub fn accepts(file_name: &str) -> bool {
        file_name.rsplit_once('.').is_some_and(|(_, ext)| {
            ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
    }
}

impl FromStr for DocumentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" | "profile_image" => Ok(Self::Profile),
            "aadhaar" | "aadhaar_image" => Ok(Self::Aadhaar),
            "pan" | "pan_image" => Ok(Self::Pan),
            "passbook" | "passbook_image" => Ok(Self::Passbook),
            _ => Err(DomainError::InvalidDocumentKind(s.to_string())),
        }
    }
}
