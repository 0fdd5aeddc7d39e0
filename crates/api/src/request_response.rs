// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Page operations return a view model; actions return an
//! [`ActionOutcome`] naming the flash and the redirect target.

use rollcall::{AttendanceCell, RosterEntry};
use rollcall_domain::{EmployeeStatus, Role};
use rollcall_persistence::{
    DashboardCounts, EmployeeData, LocationData, NotificationData, SupervisorData,
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::export::ExportFile;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Danger,
    Warning,
    Info,
}

/// A one-shot user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Danger, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Warning, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Info, message)
    }
}

/// The result of an action: where to go next and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub flash: Option<Flash>,
    pub redirect: String,
}

impl ActionOutcome {
    /// A redirect without a message.
    #[must_use]
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            flash: None,
            redirect: to.into(),
        }
    }

    /// A redirect carrying a flash.
    #[must_use]
    pub fn with_flash(flash: Flash, to: impl Into<String>) -> Self {
        Self {
            flash: Some(flash),
            redirect: to.into(),
        }
    }
}

/// A page that may instead send the caller elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse<T> {
    View(T),
    Redirect(ActionOutcome),
}

// ============================================================================
// Authentication
// ============================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Where the caller was headed before being sent to log in.
    #[serde(default)]
    pub next: Option<String>,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub login_name: String,
    pub display_name: String,
    pub role: Role,
    /// The resolved post-login destination.
    pub redirect: String,
}

// ============================================================================
// Admin pages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminDashboardView {
    pub display_name: String,
    pub counts: DashboardCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationsView {
    pub locations: Vec<LocationData>,
}

/// A supervisor option for select inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorChoice {
    pub supervisor_id: i64,
    pub name: String,
}

impl From<&SupervisorData> for SupervisorChoice {
    fn from(supervisor: &SupervisorData) -> Self {
        Self {
            supervisor_id: supervisor.supervisor_id,
            name: supervisor.person.full_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorsView {
    pub supervisors: Vec<SupervisorData>,
}

/// The add/edit supervisor form. `supervisor` is set when editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorFormView {
    pub locations: Vec<LocationData>,
    pub supervisor: Option<SupervisorData>,
}

/// Raw employee list filters from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeQuery {
    pub supervisor_id: Option<String>,
    pub location_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeesView {
    pub employees: Vec<EmployeeData>,
    pub supervisors: Vec<SupervisorChoice>,
    pub locations: Vec<LocationData>,
    /// The filters as submitted, for re-populating the form.
    pub filters: EmployeeQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeDetailView {
    pub employee: EmployeeData,
    pub supervisor_name: Option<String>,
    pub location_name: Option<String>,
}

/// The add/edit employee form. `employee` is set when editing.
///
/// Supervisors see only themselves and their own location as choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeFormView {
    pub employee: Option<EmployeeData>,
    pub supervisors: Vec<SupervisorChoice>,
    pub locations: Vec<LocationData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalQueueView {
    pub employees: Vec<EmployeeData>,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationsView {
    pub notifications: Vec<NotificationData>,
    pub unread: usize,
}

/// Raw export filters from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportQuery {
    pub supervisor_id: Option<String>,
    pub location_id: Option<String>,
    pub search: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFormView {
    pub supervisors: Vec<SupervisorChoice>,
    pub locations: Vec<LocationData>,
    /// The filters as submitted, for re-populating the form.
    pub filters: ExportQuery,
}

/// Result of the admin export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResponse {
    /// Show the filter form, with a notice when filters matched nothing.
    Form {
        view: ExportFormView,
        notice: Option<Flash>,
    },
    File(ExportFile),
}

// ============================================================================
// Supervisor pages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorDashboardView {
    pub supervisor: SupervisorData,
    /// Employees this supervisor created.
    pub employees: Vec<EmployeeData>,
}

/// Employees at the supervisor's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeListView {
    pub location_name: String,
    pub employees: Vec<EmployeeData>,
}

/// One grid cell with its form field names when it is editable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceCellView {
    pub date: Date,
    #[serde(flatten)]
    pub cell: AttendanceCell,
    pub presence_field: Option<String>,
    pub overtime_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRowView {
    pub employee: RosterEntry,
    pub cells: Vec<AttendanceCellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendancePageView {
    pub location_name: String,
    pub supervisor_name: String,
    /// Month of the target date, e.g. `October`.
    pub month_name: String,
    /// Week of the month of today, 1 through 5.
    pub week_of_month: u8,
    pub week_offset: i64,
    pub target_date: Date,
    /// Today; the only column the form submits.
    pub editable_date: Date,
    pub shows_editable_column: bool,
    pub week_dates: Vec<Date>,
    pub rows: Vec<AttendanceRowView>,
}
