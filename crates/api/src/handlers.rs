// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations, one per page or action.
//!
//! Every operation re-checks the caller's role before touching
//! persistence, even though the HTTP layer gates routes as well.

use rollcall::{
    AttendanceGrid, ExportFilter, ExportRecord, LedgerEntry, MarkPlan, ReviewOutcome,
    RosterEntry, WeeklySheet, apply_marks, apply_review, overtime_field, presence_field,
    report_file_name,
};
use rollcall_domain::{
    AttendanceWeek, DocumentKind, EmployeeStatus, FieldErrors, ReviewAction, Role, week_of_month,
};
use rollcall_persistence::{
    DashboardCounts, DocumentPaths, EmployeeData, EmployeeListFilter, LocationData,
    NotificationData, Persistence, PersistenceError, SupervisorData,
};
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::documents::{DocumentNaming, DocumentStore};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::export::{CSV_CONTENT_TYPE, ExportFile, render_report, render_weekly_sheet};
use crate::forms::{
    EmployeeAssignment, EmployeeInput, LocationInput, SubmittedForm, SupervisorInput,
    UploadedFile, collect_documents,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ActionOutcome, AdminDashboardView, ApprovalQueueView, AttendanceCellView,
    AttendancePageView, AttendanceRowView, EmployeeDetailView, EmployeeFormView,
    EmployeeListView, EmployeeQuery, EmployeesView, ExportFormView, ExportQuery, ExportResponse,
    Flash, LocationsView, LoginRequest, LoginResponse, NotificationsView, PageResponse,
    SupervisorChoice, SupervisorDashboardView, SupervisorFormView, SupervisorsView,
};

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LOCATIONS_PATH: &str = "/admin/locations";
pub const ADMIN_SUPERVISORS_PATH: &str = "/admin/supervisors";
pub const ADMIN_ADD_SUPERVISOR_PATH: &str = "/admin/add_supervisor";
pub const ADMIN_EMPLOYEES_PATH: &str = "/admin/employees";
pub const APPROVAL_QUEUE_PATH: &str = "/admin/approve-employees";
pub const ADMIN_NOTIFICATIONS_PATH: &str = "/admin/notifications";
pub const SUPERVISOR_EMPLOYEE_LIST_PATH: &str = "/supervisor/employee_list";

const SUPERVISOR_SUBDIR: &str = "supervisors";
const EMPLOYEE_SUBDIR: &str = "employees";
const NOT_A_VALID_CHOICE: &str = "Not a valid choice.";

/// Path of the attendance grid for a week offset.
#[must_use]
pub fn attendance_path(week_offset: i64) -> String {
    format!("/supervisor/mark_attendance/{week_offset}")
}

// ============================================================================
// Helpers
// ============================================================================

fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, action).map_err(ApiError::from)
}

fn require_supervisor(actor: &AuthenticatedActor, action: &str) -> Result<(), ApiError> {
    AuthorizationService::require_role(actor, Role::Supervisor, action).map_err(ApiError::from)
}

/// Loads the caller's supervisor profile.
fn supervisor_profile(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<SupervisorData, ApiError> {
    persistence
        .get_supervisor_by_user(actor.user_id)
        .map_err(|e| translate_persistence_error(e, "supervisor"))?
        .ok_or_else(|| {
            warn!(user_id = actor.user_id, "Supervisor identity has no profile");
            ApiError::MissingSupervisorProfile
        })
}

fn load_employee(persistence: &mut Persistence, employee_id: i64) -> Result<EmployeeData, ApiError> {
    persistence
        .get_employee(employee_id)
        .map_err(|e| translate_persistence_error(e, "employee"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("employee"),
            message: format!("Employee {employee_id} does not exist"),
        })
}

fn load_supervisor(
    persistence: &mut Persistence,
    supervisor_id: i64,
) -> Result<SupervisorData, ApiError> {
    persistence
        .get_supervisor(supervisor_id)
        .map_err(|e| translate_persistence_error(e, "supervisor"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("supervisor"),
            message: format!("Supervisor {supervisor_id} does not exist"),
        })
}

fn all_locations(persistence: &mut Persistence) -> Result<Vec<LocationData>, ApiError> {
    persistence
        .list_locations()
        .map_err(|e| translate_persistence_error(e, "location"))
}

fn supervisor_choices(persistence: &mut Persistence) -> Result<Vec<SupervisorChoice>, ApiError> {
    let supervisors: Vec<SupervisorData> = persistence
        .list_supervisors()
        .map_err(|e| translate_persistence_error(e, "supervisor"))?;
    Ok(supervisors.iter().map(SupervisorChoice::from).collect())
}

fn invalid_choice(field: &str) -> ApiError {
    let mut errors: FieldErrors = FieldErrors::new();
    errors.add(field, NOT_A_VALID_CHOICE);
    ApiError::ValidationFailed { errors }
}

/// Fails with a field error unless the location exists.
fn ensure_location(persistence: &mut Persistence, location_id: i64) -> Result<(), ApiError> {
    persistence
        .get_location(location_id)
        .map_err(|e| translate_persistence_error(e, "location"))?
        .map(|_| ())
        .ok_or_else(|| invalid_choice("location_id"))
}

/// Writes the submitted documents under `naming`.
fn store_documents(
    store: &DocumentStore,
    form: &SubmittedForm,
    naming: DocumentNaming<'_>,
) -> Result<DocumentPaths, ApiError> {
    let uploads: Vec<(DocumentKind, &UploadedFile)> = collect_documents(form)?;
    Ok(store.store_all(&uploads, naming)?)
}

/// Removes files written for a failed save, sparing any path the row
/// still references.
fn discard_unsaved(store: &DocumentStore, previous: &DocumentPaths, stored: &DocumentPaths) {
    for kind in DocumentKind::ALL {
        if let Some(path) = stored
            .get(kind)
            .filter(|path| previous.get(kind) != Some(*path))
        {
            store.discard(path);
        }
    }
}

/// Removes files a successful save no longer references.
fn discard_replaced(store: &DocumentStore, previous: &DocumentPaths, stored: &DocumentPaths) {
    for kind in DocumentKind::ALL {
        if let Some(old) = previous
            .get(kind)
            .filter(|old| stored.get(kind).is_some_and(|new| new != *old))
        {
            store.discard(old);
        }
    }
}

/// Maps a duplicate login name to a field error on the form.
fn map_supervisor_write_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(_) => {
            let mut errors: FieldErrors = FieldErrors::new();
            errors.add("username", "Username already exists.");
            ApiError::ValidationFailed { errors }
        }
        other => translate_persistence_error(other, "supervisor"),
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Authenticates credentials and opens a session.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The login request; `next` is honoured only for local paths
///
/// # Errors
///
/// Returns `AuthenticationFailed` for unknown logins and wrong passwords.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor): (String, AuthenticatedActor) =
        AuthenticationService::login(persistence, &request.username, &request.password)?;

    let redirect: String = AuthenticationService::resolve_next(request.next.as_deref(), actor.role);

    Ok(LoginResponse {
        session_token,
        login_name: actor.login_name,
        display_name: actor.display_name,
        role: actor.role,
        redirect,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<ActionOutcome, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(ActionOutcome::with_flash(
        Flash::info("You have been logged out."),
        LOGIN_PATH,
    ))
}

// ============================================================================
// Admin: dashboard, locations
// ============================================================================

/// Builds the admin dashboard.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or a count fails.
pub fn admin_dashboard(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<AdminDashboardView, ApiError> {
    require_admin(actor, "admin_dashboard")?;

    let counts: DashboardCounts = persistence
        .dashboard_counts()
        .map_err(|e| translate_persistence_error(e, "dashboard"))?;

    Ok(AdminDashboardView {
        display_name: actor.display_name.clone(),
        counts,
    })
}

/// Lists locations.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the query fails.
pub fn list_locations(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<LocationsView, ApiError> {
    require_admin(actor, "list_locations")?;
    Ok(LocationsView {
        locations: all_locations(persistence)?,
    })
}

/// Creates a location.
///
/// A duplicate name is not an error: the table is left unchanged and the
/// outcome carries a warning.
///
/// # Errors
///
/// Returns `ValidationFailed` for a missing or out-of-range name.
pub fn create_location(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    form: &SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "create_location")?;
    let input: LocationInput = LocationInput::parse(form)?;

    match persistence.create_location(&input.name) {
        Ok(location_id) => {
            info!(location_id, name = %input.name, "Location created");
            Ok(ActionOutcome::with_flash(
                Flash::success("Location added successfully."),
                ADMIN_LOCATIONS_PATH,
            ))
        }
        Err(PersistenceError::UniqueViolation(_)) => {
            info!(name = %input.name, "Duplicate location refused");
            Ok(ActionOutcome::with_flash(
                Flash::warning("Location already exists."),
                ADMIN_LOCATIONS_PATH,
            ))
        }
        Err(e) => Err(translate_persistence_error(e, "location")),
    }
}

// ============================================================================
// Admin: supervisors
// ============================================================================

/// Lists supervisors.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the query fails.
pub fn list_supervisors(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<SupervisorsView, ApiError> {
    require_admin(actor, "list_supervisors")?;
    let supervisors: Vec<SupervisorData> = persistence
        .list_supervisors()
        .map_err(|e| translate_persistence_error(e, "supervisor"))?;
    Ok(SupervisorsView { supervisors })
}

/// Builds the add (`None`) or edit (`Some(id)`) supervisor form.
///
/// # Errors
///
/// Returns `ResourceNotFound` when editing a missing supervisor.
pub fn supervisor_form(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    supervisor_id: Option<i64>,
) -> Result<SupervisorFormView, ApiError> {
    require_admin(actor, "supervisor_form")?;

    let supervisor: Option<SupervisorData> = supervisor_id
        .map(|id| load_supervisor(persistence, id))
        .transpose()?;

    Ok(SupervisorFormView {
        locations: all_locations(persistence)?,
        supervisor,
    })
}

/// Registers a supervisor: identity, profile, and documents.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `store` - The document store
/// * `actor` - The authenticated admin
/// * `form` - The submitted form; a password is required
///
/// # Errors
///
/// Returns `ValidationFailed` for field errors, an unknown location, a
/// rejected document, or a taken login; `PasswordPolicyViolation` for a
/// weak password.
pub fn create_supervisor(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    form: &mut SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "create_supervisor")?;

    let input: SupervisorInput = SupervisorInput::parse(form, true)?;
    ensure_location(persistence, input.profile.location_id)?;
    let password: &str = input.password.as_deref().unwrap_or_default();
    PasswordPolicy::default().validate(password, &input.login_name)?;

    let stored: DocumentPaths = store_documents(
        store,
        form,
        DocumentNaming::Unique {
            subdir: SUPERVISOR_SUBDIR,
        },
    )?;

    let supervisor_id: i64 = persistence
        .create_supervisor(&input.login_name, password, &input.profile, &stored)
        .map_err(|e| {
            store.discard_all(&stored);
            map_supervisor_write_error(e)
        })?;

    info!(
        supervisor_id,
        login_name = %input.login_name,
        location_id = input.profile.location_id,
        "Supervisor registered"
    );
    Ok(ActionOutcome::with_flash(
        Flash::success("Supervisor registered successfully!"),
        ADMIN_ADD_SUPERVISOR_PATH,
    ))
}

/// Updates a supervisor.
///
/// Uploaded documents replace the stored ones under deterministic names.
/// A new password revokes the supervisor's sessions.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing supervisor, plus the errors of
/// [`create_supervisor`].
pub fn update_supervisor(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    supervisor_id: i64,
    form: &mut SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "update_supervisor")?;
    let existing: SupervisorData = load_supervisor(persistence, supervisor_id)?;

    let input: SupervisorInput = SupervisorInput::parse(form, false)?;
    ensure_location(persistence, input.profile.location_id)?;
    if let Some(password) = input.password.as_deref() {
        PasswordPolicy::default().validate(password, &input.login_name)?;
    }

    let stored: DocumentPaths = store_documents(
        store,
        form,
        DocumentNaming::Deterministic {
            owner_id: supervisor_id,
        },
    )?;

    let revoked: usize = persistence
        .update_supervisor(
            supervisor_id,
            &input.login_name,
            &input.profile,
            &stored,
            input.password.as_deref(),
        )
        .map_err(|e| {
            discard_unsaved(store, &existing.documents, &stored);
            map_supervisor_write_error(e)
        })?;
    discard_replaced(store, &existing.documents, &stored);

    info!(
        supervisor_id,
        revoked_sessions = revoked,
        "Supervisor updated"
    );
    Ok(ActionOutcome::with_flash(
        Flash::success("Supervisor updated successfully!"),
        ADMIN_SUPERVISORS_PATH,
    ))
}

/// Deletes a supervisor with its identity, sessions, and documents.
///
/// A supervisor with employees assigned is kept and the outcome carries a
/// danger notice.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing supervisor.
pub fn delete_supervisor(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    supervisor_id: i64,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "delete_supervisor")?;
    let existing: SupervisorData = load_supervisor(persistence, supervisor_id)?;

    match persistence.delete_supervisor(supervisor_id) {
        Ok(()) => {
            store.discard_all(&existing.documents);
            info!(supervisor_id, user_id = existing.user_id, "Supervisor deleted");
            Ok(ActionOutcome::with_flash(
                Flash::success("Supervisor deleted successfully!"),
                ADMIN_SUPERVISORS_PATH,
            ))
        }
        Err(PersistenceError::SupervisorHasEmployees { employee_count, .. }) => {
            warn!(supervisor_id, employee_count, "Supervisor delete refused");
            Ok(ActionOutcome::with_flash(
                Flash::danger(format!(
                    "Cannot delete supervisor: {employee_count} employee(s) still assigned."
                )),
                ADMIN_SUPERVISORS_PATH,
            ))
        }
        Err(e) => Err(translate_persistence_error(e, "supervisor")),
    }
}

// ============================================================================
// Admin: approvals
// ============================================================================

/// Lists employees awaiting approval.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the query fails.
pub fn approval_queue(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ApprovalQueueView, ApiError> {
    require_admin(actor, "approval_queue")?;

    let employees: Vec<EmployeeData> = persistence
        .list_employees(&EmployeeListFilter {
            status: Some(EmployeeStatus::Pending),
            ..EmployeeListFilter::default()
        })
        .map_err(|e| translate_persistence_error(e, "employee"))?;

    Ok(ApprovalQueueView {
        employees,
        status: EmployeeStatus::Pending,
    })
}

/// Applies an approval action to an employee.
///
/// `accept` approves and `reject` rejects. Any other action changes
/// nothing and carries no notice.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee.
pub fn review_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    employee_id: i64,
    action: &str,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "review_employee")?;
    let employee: EmployeeData = load_employee(persistence, employee_id)?;

    let Some(outcome) = apply_review(employee.status, action) else {
        warn!(employee_id, action, "Ignoring unknown approval action");
        return Ok(ActionOutcome::redirect(APPROVAL_QUEUE_PATH));
    };
    let ReviewOutcome {
        action,
        previous,
        next,
    } = outcome;

    persistence
        .set_employee_status(employee_id, next)
        .map_err(|e| translate_persistence_error(e, "employee"))?;
    info!(
        employee_id,
        from = previous.as_str(),
        to = next.as_str(),
        "Employee status changed"
    );

    let flash: Flash = match action {
        ReviewAction::Accept => Flash::success("Employee approved."),
        ReviewAction::Reject => Flash::danger("Employee rejected."),
    };
    Ok(ActionOutcome::with_flash(flash, APPROVAL_QUEUE_PATH))
}

// ============================================================================
// Admin: employees
// ============================================================================

/// Lists employees with optional supervisor, location, and search filters.
///
/// Unparseable ids are ignored.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or a query fails.
pub fn list_employees(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &EmployeeQuery,
) -> Result<EmployeesView, ApiError> {
    require_admin(actor, "list_employees")?;

    let id = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
    let filter: EmployeeListFilter = EmployeeListFilter {
        supervisor_id: id(query.supervisor_id.as_deref()),
        location_id: id(query.location_id.as_deref()),
        status: None,
        search: query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
    };

    let employees: Vec<EmployeeData> = persistence
        .list_employees(&filter)
        .map_err(|e| translate_persistence_error(e, "employee"))?;

    Ok(EmployeesView {
        employees,
        supervisors: supervisor_choices(persistence)?,
        locations: all_locations(persistence)?,
        filters: query.clone(),
    })
}

/// Shows one employee with supervisor and location names resolved.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee.
pub fn employee_detail(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    employee_id: i64,
) -> Result<EmployeeDetailView, ApiError> {
    require_admin(actor, "employee_detail")?;
    let employee: EmployeeData = load_employee(persistence, employee_id)?;

    let supervisor_name: Option<String> = persistence
        .get_supervisor(employee.supervisor_id)
        .map_err(|e| translate_persistence_error(e, "supervisor"))?
        .map(|s| s.person.full_name());
    let location_name: Option<String> = persistence
        .get_location(employee.location_id)
        .map_err(|e| translate_persistence_error(e, "location"))?
        .map(|l| l.name);

    Ok(EmployeeDetailView {
        employee,
        supervisor_name,
        location_name,
    })
}

/// Builds the admin employee edit form with every supervisor and location
/// as a choice.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee.
pub fn employee_form_admin(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    employee_id: i64,
) -> Result<EmployeeFormView, ApiError> {
    require_admin(actor, "employee_form_admin")?;
    let employee: EmployeeData = load_employee(persistence, employee_id)?;

    Ok(EmployeeFormView {
        employee: Some(employee),
        supervisors: supervisor_choices(persistence)?,
        locations: all_locations(persistence)?,
    })
}

/// Updates an employee, including its supervisor and location.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee and
/// `ValidationFailed` for field errors or unknown choices.
pub fn update_employee_admin(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    employee_id: i64,
    form: &mut SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "update_employee_admin")?;
    let existing: EmployeeData = load_employee(persistence, employee_id)?;

    let input: EmployeeInput = EmployeeInput::parse(form, true)?;
    let assignment: EmployeeAssignment = input.assignment.ok_or_else(|| ApiError::Internal {
        message: String::from("Assignment missing from admin employee form"),
    })?;
    if persistence
        .get_supervisor(assignment.supervisor_id)
        .map_err(|e| translate_persistence_error(e, "supervisor"))?
        .is_none()
    {
        return Err(invalid_choice("supervisor_id"));
    }
    ensure_location(persistence, assignment.location_id)?;

    save_employee(persistence, store, &existing, assignment, &input, form)?;

    Ok(ActionOutcome::with_flash(
        Flash::success("Employee updated successfully."),
        ADMIN_EMPLOYEES_PATH,
    ))
}

/// Stores documents and writes an employee's profile and assignment.
fn save_employee(
    persistence: &mut Persistence,
    store: &DocumentStore,
    existing: &EmployeeData,
    assignment: EmployeeAssignment,
    input: &EmployeeInput,
    form: &SubmittedForm,
) -> Result<(), ApiError> {
    let stored: DocumentPaths = store_documents(
        store,
        form,
        DocumentNaming::Unique {
            subdir: EMPLOYEE_SUBDIR,
        },
    )?;

    persistence
        .update_employee(
            existing.employee_id,
            assignment.supervisor_id,
            assignment.location_id,
            &input.person,
            &stored,
        )
        .map_err(|e| {
            discard_unsaved(store, &existing.documents, &stored);
            translate_persistence_error(e, "employee")
        })?;
    discard_replaced(store, &existing.documents, &stored);

    info!(
        employee_id = existing.employee_id,
        supervisor_id = assignment.supervisor_id,
        location_id = assignment.location_id,
        "Employee updated"
    );
    Ok(())
}

/// Deletes an employee with its attendance, notifications, and documents.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee.
pub fn delete_employee(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    employee_id: i64,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "delete_employee")?;
    let existing: EmployeeData = load_employee(persistence, employee_id)?;

    persistence
        .delete_employee(employee_id)
        .map_err(|e| translate_persistence_error(e, "employee"))?;
    store.discard_all(&existing.documents);

    info!(employee_id, "Employee deleted");
    Ok(ActionOutcome::with_flash(
        Flash::success("Employee deleted successfully!"),
        ADMIN_EMPLOYEES_PATH,
    ))
}

// ============================================================================
// Admin: notifications, export
// ============================================================================

/// Lists notifications, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the query fails.
pub fn notifications(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<NotificationsView, ApiError> {
    require_admin(actor, "notifications")?;

    let notifications: Vec<NotificationData> = persistence
        .list_notifications()
        .map_err(|e| translate_persistence_error(e, "notification"))?;
    let unread: usize = notifications.iter().filter(|n| !n.is_read).count();

    Ok(NotificationsView {
        notifications,
        unread,
    })
}

/// Marks a notification read.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing notification.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    notification_id: i64,
) -> Result<ActionOutcome, ApiError> {
    require_admin(actor, "mark_notification_read")?;

    persistence
        .mark_notification_read(notification_id)
        .map_err(|e| translate_persistence_error(e, "notification"))?;

    Ok(ActionOutcome::redirect(ADMIN_NOTIFICATIONS_PATH))
}

/// Runs the filtered attendance export.
///
/// With no usable filter the filter form is returned. With filters that
/// match nothing the form comes back with an info notice. Otherwise the
/// matching records are rendered as a CSV attachment.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated admin
/// * `query` - Raw filter values; unparseable ids and dates are ignored
/// * `now` - Timestamp for the file name
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a query fails, or the
/// CSV cannot be written.
pub fn export_attendance(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ExportQuery,
    now: OffsetDateTime,
) -> Result<ExportResponse, ApiError> {
    require_admin(actor, "export_attendance")?;

    let filter: ExportFilter = ExportFilter::from_query(
        query.supervisor_id.as_deref(),
        query.location_id.as_deref(),
        query.search.as_deref(),
        query.from_date.as_deref(),
        query.to_date.as_deref(),
    );

    if filter.is_empty() {
        return Ok(ExportResponse::Form {
            view: export_form_view(persistence, query)?,
            notice: None,
        });
    }

    let records: Vec<ExportRecord> = persistence
        .export_attendance(&filter)
        .map_err(|e| translate_persistence_error(e, "attendance"))?;

    if records.is_empty() {
        info!(?filter, "Export matched no attendance records");
        return Ok(ExportResponse::Form {
            view: export_form_view(persistence, query)?,
            notice: Some(Flash::info(
                "No attendance records found matching the criteria.",
            )),
        });
    }

    let bytes: Vec<u8> = render_report(&records)?;
    info!(rows = records.len(), "Attendance report exported");

    Ok(ExportResponse::File(ExportFile {
        file_name: report_file_name(now),
        content_type: CSV_CONTENT_TYPE,
        bytes,
    }))
}

fn export_form_view(
    persistence: &mut Persistence,
    query: &ExportQuery,
) -> Result<ExportFormView, ApiError> {
    Ok(ExportFormView {
        supervisors: supervisor_choices(persistence)?,
        locations: all_locations(persistence)?,
        filters: query.clone(),
    })
}

// ============================================================================
// Supervisor: dashboard, listings
// ============================================================================

/// Builds the supervisor dashboard: the employees this supervisor created.
///
/// # Errors
///
/// Returns `MissingSupervisorProfile` if the identity has no profile.
pub fn supervisor_dashboard(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<SupervisorDashboardView, ApiError> {
    require_supervisor(actor, "supervisor_dashboard")?;
    let supervisor: SupervisorData = supervisor_profile(persistence, actor)?;

    let employees: Vec<EmployeeData> = persistence
        .list_employees(&EmployeeListFilter {
            supervisor_id: Some(supervisor.supervisor_id),
            ..EmployeeListFilter::default()
        })
        .map_err(|e| translate_persistence_error(e, "employee"))?;

    Ok(SupervisorDashboardView {
        supervisor,
        employees,
    })
}

/// Lists every employee at the supervisor's location.
///
/// # Errors
///
/// Returns `MissingSupervisorProfile` if the identity has no profile.
pub fn location_employees(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<EmployeeListView, ApiError> {
    require_supervisor(actor, "location_employees")?;
    let supervisor: SupervisorData = supervisor_profile(persistence, actor)?;

    let employees: Vec<EmployeeData> = persistence
        .list_employees(&EmployeeListFilter {
            location_id: Some(supervisor.location_id),
            ..EmployeeListFilter::default()
        })
        .map_err(|e| translate_persistence_error(e, "employee"))?;

    Ok(EmployeeListView {
        location_name: supervisor.location_name,
        employees,
    })
}

// ============================================================================
// Supervisor: attendance
// ============================================================================

/// The supervisor's profile with its location and roster.
struct AttendanceScope {
    supervisor: SupervisorData,
    location: LocationData,
    roster: Vec<RosterEntry>,
}

impl AttendanceScope {
    fn load(
        persistence: &mut Persistence,
        actor: &AuthenticatedActor,
    ) -> Result<Self, ApiError> {
        let supervisor: SupervisorData = supervisor_profile(persistence, actor)?;
        let location: LocationData = persistence
            .get_location(supervisor.location_id)
            .map_err(|e| translate_persistence_error(e, "location"))?
            .ok_or(ApiError::MissingSupervisorProfile)?;
        let roster: Vec<RosterEntry> = persistence
            .list_roster(location.location_id)
            .map_err(|e| translate_persistence_error(e, "employee"))?;

        Ok(Self {
            supervisor,
            location,
            roster,
        })
    }

    fn employee_ids(&self) -> Vec<i64> {
        self.roster.iter().map(|e| e.employee_id).collect()
    }

    fn ledger(
        &self,
        persistence: &mut Persistence,
        week: &AttendanceWeek,
    ) -> Result<Vec<LedgerEntry>, ApiError> {
        persistence
            .week_ledger(&self.employee_ids(), week.monday(), week.sunday())
            .map_err(|e| translate_persistence_error(e, "attendance"))
    }
}

/// Builds the weekly attendance grid.
///
/// A negative offset redirects to the current week with an info notice.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated supervisor
/// * `today` - The local date; the only editable column
/// * `week_offset` - Weeks ahead of the current week
///
/// # Errors
///
/// Returns `MissingSupervisorProfile` without a profile or location and
/// `NoEmployeesAtLocation` for an empty roster.
pub fn attendance_page(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    today: Date,
    week_offset: i64,
) -> Result<PageResponse<AttendancePageView>, ApiError> {
    require_supervisor(actor, "attendance_page")?;

    if week_offset < 0 {
        return Ok(PageResponse::Redirect(ActionOutcome::with_flash(
            Flash::info("No previous attendance records available."),
            attendance_path(0),
        )));
    }

    let scope: AttendanceScope = AttendanceScope::load(persistence, actor)?;
    if scope.roster.is_empty() {
        return Err(ApiError::NoEmployeesAtLocation);
    }

    let week: AttendanceWeek =
        AttendanceWeek::for_offset(today, week_offset).map_err(translate_domain_error)?;
    let ledger: Vec<LedgerEntry> = scope.ledger(persistence, &week)?;
    let grid: AttendanceGrid = AttendanceGrid::assemble(week, today, &scope.roster, &ledger);

    Ok(PageResponse::View(attendance_view(&scope, &grid)))
}

fn attendance_view(scope: &AttendanceScope, grid: &AttendanceGrid) -> AttendancePageView {
    let week: &AttendanceWeek = grid.week();
    let editable: Date = grid.editable_date();

    let rows: Vec<AttendanceRowView> = grid
        .rows()
        .iter()
        .map(|row| AttendanceRowView {
            employee: row.employee.clone(),
            cells: row
                .cells
                .iter()
                .map(|(date, cell)| {
                    let is_editable: bool = *date == editable;
                    let employee_id: i64 = row.employee.employee_id;
                    AttendanceCellView {
                        date: *date,
                        cell: *cell,
                        presence_field: is_editable.then(|| presence_field(employee_id, *date)),
                        overtime_field: is_editable.then(|| overtime_field(employee_id, *date)),
                    }
                })
                .collect(),
        })
        .collect();

    AttendancePageView {
        location_name: scope.location.name.clone(),
        supervisor_name: scope.supervisor.person.full_name(),
        month_name: week.month_name(),
        week_of_month: week_of_month(editable),
        week_offset: week.offset(),
        target_date: week.target_date(),
        editable_date: editable,
        shows_editable_column: grid.shows_editable_column(),
        week_dates: week.days().to_vec(),
        rows,
    }
}

/// Records today's attendance for the supervisor's location.
///
/// Only today's fields are read from the form. The batch commits as one
/// transaction; a failed commit is logged and reported with a danger
/// notice, and nothing is written.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated supervisor
/// * `today` - The local date being marked
/// * `week_offset` - The week to return to; negative values write nothing
/// * `form` - The submitted grid form
///
/// # Errors
///
/// Returns `MissingSupervisorProfile` without a profile or location and
/// `NoEmployeesAtLocation` for an empty roster.
pub fn mark_attendance(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    today: Date,
    week_offset: i64,
    form: &SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_supervisor(actor, "mark_attendance")?;

    if week_offset < 0 {
        return Ok(ActionOutcome::with_flash(
            Flash::info("No previous attendance records available."),
            attendance_path(0),
        ));
    }
    let redirect: String = attendance_path(week_offset);

    let scope: AttendanceScope = AttendanceScope::load(persistence, actor)?;
    let plan: MarkPlan = apply_marks(today, actor.user_id, &scope.employee_ids(), |name| {
        form.get(name)
    })
    .map_err(translate_core_error)?;

    match persistence.mark_attendance(&plan) {
        Ok(written) => {
            info!(
                supervisor_id = scope.supervisor.supervisor_id,
                date = %plan.date,
                written,
                "Attendance recorded"
            );
            Ok(ActionOutcome::with_flash(
                Flash::success("Attendance updated successfully!"),
                redirect,
            ))
        }
        Err(e) => {
            error!(
                supervisor_id = scope.supervisor.supervisor_id,
                date = %plan.date,
                error = %e,
                "Attendance batch rolled back"
            );
            Ok(ActionOutcome::with_flash(
                Flash::danger("Error updating attendance."),
                redirect,
            ))
        }
    }
}

/// Exports the current week at the supervisor's location.
///
/// # Errors
///
/// Returns `MissingSupervisorProfile` without a profile or location, or
/// an error if a query or the CSV writer fails.
pub fn weekly_export(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    today: Date,
) -> Result<ExportFile, ApiError> {
    require_supervisor(actor, "weekly_export")?;

    let scope: AttendanceScope = AttendanceScope::load(persistence, actor)?;
    let week: AttendanceWeek = AttendanceWeek::current(today).map_err(translate_domain_error)?;
    let ledger: Vec<LedgerEntry> = scope.ledger(persistence, &week)?;

    let sheet: WeeklySheet = WeeklySheet::build(&week, &scope.location.name, &scope.roster, &ledger);
    let bytes: Vec<u8> = render_weekly_sheet(&sheet)?;

    info!(
        supervisor_id = scope.supervisor.supervisor_id,
        week_start = %week.monday(),
        "Weekly attendance exported"
    );
    Ok(ExportFile {
        file_name: String::from(WeeklySheet::FILE_NAME),
        content_type: CSV_CONTENT_TYPE,
        bytes,
    })
}

// ============================================================================
// Supervisor: employees
// ============================================================================

/// Builds the supervisor's add (`None`) or edit (`Some(id)`) employee
/// form. The only choices are the supervisor and its location.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee and `AccessDenied`
/// for an employee at another location.
pub fn employee_form_supervisor(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    employee_id: Option<i64>,
) -> Result<EmployeeFormView, ApiError> {
    require_supervisor(actor, "employee_form_supervisor")?;
    let supervisor: SupervisorData = supervisor_profile(persistence, actor)?;

    let employee: Option<EmployeeData> = match employee_id {
        Some(id) => {
            let employee: EmployeeData = load_employee(persistence, id)?;
            AuthorizationService::authorize_employee_edit(&supervisor, &employee)?;
            Some(employee)
        }
        None => None,
    };

    Ok(EmployeeFormView {
        employee,
        supervisors: vec![SupervisorChoice::from(&supervisor)],
        locations: vec![LocationData {
            location_id: supervisor.location_id,
            name: supervisor.location_name.clone(),
        }],
    })
}

/// Adds a pending employee at the supervisor's location.
///
/// # Errors
///
/// Returns `ValidationFailed` for field errors or rejected documents.
pub fn add_employee(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    form: &mut SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_supervisor(actor, "add_employee")?;
    let supervisor: SupervisorData = supervisor_profile(persistence, actor)?;

    let input: EmployeeInput = EmployeeInput::parse(form, false)?;
    let stored: DocumentPaths = store_documents(
        store,
        form,
        DocumentNaming::Unique {
            subdir: EMPLOYEE_SUBDIR,
        },
    )?;

    let employee_id: i64 = persistence
        .create_employee(
            supervisor.supervisor_id,
            supervisor.location_id,
            &input.person,
            &stored,
        )
        .map_err(|e| {
            store.discard_all(&stored);
            translate_persistence_error(e, "employee")
        })?;

    info!(
        employee_id,
        supervisor_id = supervisor.supervisor_id,
        location_id = supervisor.location_id,
        "Employee added pending approval"
    );
    Ok(ActionOutcome::with_flash(
        Flash::success("Employee added successfully. Pending approval."),
        Role::Supervisor.dashboard_path(),
    ))
}

/// Updates an employee at the supervisor's location. The supervisor and
/// location assignment is kept.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing employee, `AccessDenied` for
/// an employee at another location, and `ValidationFailed` for field
/// errors.
pub fn edit_employee_supervisor(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedActor,
    employee_id: i64,
    form: &mut SubmittedForm,
) -> Result<ActionOutcome, ApiError> {
    require_supervisor(actor, "edit_employee_supervisor")?;
    let supervisor: SupervisorData = supervisor_profile(persistence, actor)?;
    let existing: EmployeeData = load_employee(persistence, employee_id)?;
    AuthorizationService::authorize_employee_edit(&supervisor, &existing)?;

    let input: EmployeeInput = EmployeeInput::parse(form, false)?;
    let assignment: EmployeeAssignment = EmployeeAssignment {
        supervisor_id: existing.supervisor_id,
        location_id: existing.location_id,
    };
    save_employee(persistence, store, &existing, assignment, &input, form)?;

    Ok(ActionOutcome::with_flash(
        Flash::success("Employee updated successfully."),
        SUPERVISOR_EMPLOYEE_LIST_PATH,
    ))
}
