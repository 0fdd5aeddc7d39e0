// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Rollcall attendance system.
//!
//! Each page or action is one function in [`handlers`] taking the
//! persistence layer and the authenticated actor. Operations return view
//! models or [`ActionOutcome`]s; the HTTP layer only renders them.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod documents;
mod error;
mod export;
mod forms;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use documents::{DocumentError, DocumentNaming, DocumentStore, content_type, sanitize_file_name};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use export::{CSV_CONTENT_TYPE, ExportFile, render_report, render_weekly_sheet};
pub use forms::{
    EmployeeAssignment, EmployeeInput, IMAGES_ONLY, LocationInput, SubmittedForm,
    SupervisorInput, UploadedFile, collect_documents,
};
pub use handlers::{
    ADMIN_ADD_SUPERVISOR_PATH, ADMIN_EMPLOYEES_PATH, ADMIN_LOCATIONS_PATH,
    ADMIN_NOTIFICATIONS_PATH, ADMIN_SUPERVISORS_PATH, APPROVAL_QUEUE_PATH, LOGIN_PATH, SUPERVISOR_EMPLOYEE_LIST_PATH, add_employee,
    admin_dashboard, approval_queue, attendance_page, attendance_path, create_location,
    create_supervisor, delete_employee, delete_supervisor, edit_employee_supervisor,
    employee_detail, employee_form_admin, employee_form_supervisor, export_attendance,
    list_employees, list_locations, list_supervisors, location_employees, login, logout,
    mark_attendance, mark_notification_read, notifications, review_employee, supervisor_dashboard,
    supervisor_form, update_employee_admin, update_supervisor, weekly_export,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ActionOutcome, AdminDashboardView, ApprovalQueueView, AttendanceCellView, AttendancePageView,
    AttendanceRowView, EmployeeDetailView, EmployeeFormView, EmployeeListView, EmployeeQuery,
    EmployeesView, ExportFormView, ExportQuery, ExportResponse, Flash, FlashKind, LocationsView,
    LoginRequest, LoginResponse, NotificationsView, PageResponse, SupervisorChoice,
    SupervisorDashboardView, SupervisorFormView, SupervisorsView,
};
