// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::{DocumentKind, EmployeeStatus, Role};
use serde::Serialize;
use time::Date;

/// A login identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationData {
    pub location_id: i64,
    pub name: String,
}

/// Personal, identity, and bank fields shared by supervisors and employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonProfile {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob: Date,
    pub doj: Date,
    pub phone: String,
    pub employee_code: String,
    pub designation: String,
    pub aadhaar_no: String,
    pub pan_no: String,
    pub account_number: String,
    pub ifsc: String,
    pub bank_name: String,
    pub current_address: String,
    pub permanent_address: String,
}

impl PersonProfile {
    /// `First Last`, the form used in listings and exports.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Stored document paths, one slot per `DocumentKind`.
///
/// On update, `None` leaves the stored path untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentPaths {
    pub profile_image: Option<String>,
    pub aadhaar_image: Option<String>,
    pub pan_image: Option<String>,
    pub passbook_image: Option<String>,
}

impl DocumentPaths {
    #[must_use]
    pub const fn get(&self, kind: DocumentKind) -> Option<&String> {
        match kind {
            DocumentKind::Profile => self.profile_image.as_ref(),
            DocumentKind::Aadhaar => self.aadhaar_image.as_ref(),
            DocumentKind::Pan => self.pan_image.as_ref(),
            DocumentKind::Passbook => self.passbook_image.as_ref(),
        }
    }

    pub fn set(&mut self, kind: DocumentKind, path: String) {
        let slot: &mut Option<String> = match kind {
            DocumentKind::Profile => &mut self.profile_image,
            DocumentKind::Aadhaar => &mut self.aadhaar_image,
            DocumentKind::Pan => &mut self.pan_image,
            DocumentKind::Passbook => &mut self.passbook_image,
        };
        *slot = Some(path);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.profile_image.is_none()
            && self.aadhaar_image.is_none()
            && self.pan_image.is_none()
            && self.passbook_image.is_none()
    }
}

/// Supervisor-only fields on top of the shared profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorProfile {
    pub location_id: i64,
    pub esic_no: Option<String>,
    pub uan_no: Option<String>,
    pub person: PersonProfile,
}

/// A supervisor with its login name and location name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorData {
    pub supervisor_id: i64,
    pub user_id: i64,
    pub login_name: String,
    pub location_id: i64,
    pub location_name: String,
    pub esic_no: Option<String>,
    pub uan_no: Option<String>,
    #[serde(flatten)]
    pub person: PersonProfile,
    #[serde(flatten)]
    pub documents: DocumentPaths,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeData {
    pub employee_id: i64,
    pub supervisor_id: i64,
    pub location_id: i64,
    pub status: EmployeeStatus,
    #[serde(flatten)]
    pub person: PersonProfile,
    #[serde(flatten)]
    pub documents: DocumentPaths,
    pub created_at: String,
}

/// Filters for employee listings. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeListFilter {
    pub supervisor_id: Option<i64>,
    pub location_id: Option<i64>,
    pub status: Option<EmployeeStatus>,
    /// Case-insensitive substring over first name, last name, phone, and
    /// Aadhaar number.
    pub search: Option<String>,
}

/// A notification with the referenced employee's name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationData {
    pub notification_id: i64,
    pub kind: String,
    pub employee_id: i64,
    pub employee_name: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub locations: i64,
    pub supervisors: i64,
    pub employees: i64,
    pub pending_employees: i64,
    pub unread_notifications: i64,
}
