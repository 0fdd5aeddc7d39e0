// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP handlers. Each one extracts its inputs, calls the matching API
//! operation under the persistence lock, and renders the result.

use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use rollcall_api::{
    ActionOutcome, ApiError, DocumentStore, EmployeeQuery, ExportQuery, ExportResponse, Flash, LoginRequest,
    LoginResponse, PageResponse, SubmittedForm, add_employee, admin_dashboard, approval_queue,
    attendance_page, content_type, create_location, create_supervisor, delete_employee,
    delete_supervisor, edit_employee_supervisor, employee_detail, employee_form_admin,
    employee_form_supervisor, export_attendance, list_employees, list_locations,
    list_supervisors, location_employees, login, logout, mark_attendance,
    mark_notification_read, notifications, review_employee, supervisor_dashboard,
    supervisor_form, translate_domain_error, update_employee_admin, update_supervisor,
    weekly_export,
};
use rollcall_domain::local_today;
use rollcall_persistence::Persistence;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tower_cookies::Cookies;
use tracing::{error, info, warn};

use crate::AppState;
use crate::form::FormData;
use crate::response::{self, HttpError, RequestKind};
use crate::session::{self, AdminSession, AnySession, SupervisorSession};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";
const UPLOAD_CACHE_CONTROL: &str = "private, max-age=300";

/// Query string of the login page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Login form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Page model of the login form.
#[derive(Debug, Clone, Serialize)]
struct LoginPage {
    next: Option<String>,
}

/// Resolves today's date in the configured timezone.
fn current_date(app_state: &AppState) -> Result<Date, ApiError> {
    local_today(&app_state.timezone, chrono::Utc::now()).map_err(translate_domain_error)
}

/// Runs an operation that stores or deletes uploaded documents.
///
/// Database and filesystem work both block, so the operation runs on the
/// blocking pool and takes the persistence lock there.
async fn with_documents<F>(app_state: &AppState, operation: F) -> Response
where
    F: FnOnce(&mut Persistence, &DocumentStore) -> Response + Send + 'static,
{
    let persistence = Arc::clone(&app_state.persistence);
    let documents: DocumentStore = app_state.documents.clone();

    let task = tokio::task::spawn_blocking(move || {
        let mut guard = persistence.blocking_lock();
        operation(&mut guard, &documents)
    });

    match task.await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Document task failed");
            HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                .into_response()
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Handler for GET `/` and GET `/login`.
///
/// A caller with a live session goes straight to their dashboard.
pub async fn handle_login_page(
    AxumState(app_state): AxumState<AppState>,
    cookies: Cookies,
    Query(query): Query<LoginQuery>,
) -> Response {
    if let Some((actor, _)) = session::authenticate(&app_state, &cookies).await {
        return Redirect::to(actor.role.dashboard_path()).into_response();
    }
    response::page(&cookies, LoginPage { next: query.next })
}

/// Handler for POST `/login`.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    cookies: Cookies,
    Query(query): Query<LoginQuery>,
    Form(form): Form<LoginForm>,
) -> Response {
    let next: Option<String> = form.next.filter(|n| !n.is_empty()).or(query.next);
    let request: LoginRequest = LoginRequest {
        username: form.username,
        password: form.password,
        next: next.clone(),
    };

    let mut persistence = app_state.persistence.lock().await;
    match login(&mut persistence, &request) {
        Ok(LoginResponse {
            session_token,
            login_name,
            role,
            redirect,
            ..
        }) => {
            drop(persistence);
            info!(login_name = %login_name, role = role.as_str(), "Signed in");
            session::begin(&cookies, session_token);
            response::redirect(
                &cookies,
                ActionOutcome::with_flash(Flash::success("Login successful!"), redirect),
            )
        }
        Err(ApiError::AuthenticationFailed { reason }) => {
            drop(persistence);
            info!(reason = %reason, "Sign-in refused");
            response::page_with(
                &cookies,
                StatusCode::UNAUTHORIZED,
                LoginPage { next },
                vec![Flash::danger(INVALID_CREDENTIALS_MESSAGE)],
                None,
            )
        }
        Err(err) => {
            drop(persistence);
            warn!(error = %err, "Sign-in failed");
            HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Handler for GET `/logout`.
pub async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    session: AnySession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let result = logout(&mut persistence, &session.session_token);
    drop(persistence);

    session::end(&session.cookies);
    info!(login_name = %session.actor.login_name, "Signed out");
    session.action(result)
}

/// Handler for GET `/uploads/{*path}`.
pub async fn handle_upload(
    AxumState(app_state): AxumState<AppState>,
    _session: AnySession,
    Path(path): Path<String>,
) -> Result<Response, HttpError> {
    let Some(on_disk) = app_state.documents.resolve(&path) else {
        warn!(path = %path, "Refused upload path");
        return Err(HttpError::new(StatusCode::NOT_FOUND, "Document not found"));
    };

    let bytes: Vec<u8> = tokio::fs::read(&on_disk).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HttpError::new(StatusCode::NOT_FOUND, "Document not found")
        } else {
            error!(path = %path, error = %e, "Document could not be read");
            HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "Document could not be read")
        }
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type(&path)),
            (header::CACHE_CONTROL, UPLOAD_CACHE_CONTROL),
        ],
        bytes,
    )
        .into_response())
}

// ============================================================================
// Admin
// ============================================================================

/// Handler for GET `/admin/dashboard`.
pub async fn handle_admin_dashboard(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(admin_dashboard(&mut persistence, &session.actor))
}

/// Handler for GET `/admin/locations`.
pub async fn handle_list_locations(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(list_locations(&mut persistence, &session.actor))
}

/// Handler for POST `/admin/locations`.
pub async fn handle_create_location(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    FormData(form): FormData,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let result = create_location(&mut persistence, &session.actor, &form);
    session.submit(result, || list_locations(&mut persistence, &session.actor))
}

/// Handler for GET `/admin/supervisors`.
pub async fn handle_list_supervisors(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(list_supervisors(&mut persistence, &session.actor))
}

/// Handler for GET `/admin/add_supervisor`.
pub async fn handle_new_supervisor_form(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(supervisor_form(&mut persistence, &session.actor, None))
}

/// Handler for POST `/admin/add_supervisor`.
pub async fn handle_create_supervisor(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    FormData(mut form): FormData,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        let result = create_supervisor(
            persistence,
            documents,
            &session.actor,
            &mut form,
        );
        session.submit(result, || {
            supervisor_form(persistence, &session.actor, None)
        })
    })
    .await
}

/// Handler for GET `/admin/supervisors/edit/{supervisor_id}`.
pub async fn handle_edit_supervisor_form(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(supervisor_id): Path<i64>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(supervisor_form(
        &mut persistence,
        &session.actor,
        Some(supervisor_id),
    ))
}

/// Handler for POST `/admin/supervisors/edit/{supervisor_id}`.
pub async fn handle_update_supervisor(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(supervisor_id): Path<i64>,
    FormData(mut form): FormData,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        let result = update_supervisor(
            persistence,
            documents,
            &session.actor,
            supervisor_id,
            &mut form,
        );
        session.submit(result, || {
            supervisor_form(persistence, &session.actor, Some(supervisor_id))
        })
    })
    .await
}

/// Handler for POST `/admin/supervisors/delete/{supervisor_id}`.
pub async fn handle_delete_supervisor(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(supervisor_id): Path<i64>,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        session.action(delete_supervisor(
            persistence,
            documents,
            &session.actor,
            supervisor_id,
        ))
    })
    .await
}

/// Handler for GET `/admin/approve-employees`.
pub async fn handle_approval_queue(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(approval_queue(&mut persistence, &session.actor))
}

/// Handler for GET `/admin/employee_action/{employee_id}/{action}`.
pub async fn handle_review_employee(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path((employee_id, action)): Path<(i64, String)>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.action(review_employee(
        &mut persistence,
        &session.actor,
        employee_id,
        &action,
    ))
}

/// Handler for GET `/admin/employees`.
pub async fn handle_list_employees(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Query(query): Query<EmployeeQuery>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(list_employees(&mut persistence, &session.actor, &query))
}

/// Handler for GET `/admin/employees/{employee_id}`.
pub async fn handle_employee_detail(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(employee_id): Path<i64>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(employee_detail(&mut persistence, &session.actor, employee_id))
}

/// Handler for GET `/admin/employees/{employee_id}/edit`.
pub async fn handle_admin_employee_form(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(employee_id): Path<i64>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(employee_form_admin(
        &mut persistence,
        &session.actor,
        employee_id,
    ))
}

/// Handler for POST `/admin/employees/{employee_id}/edit`.
pub async fn handle_admin_update_employee(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(employee_id): Path<i64>,
    FormData(mut form): FormData,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        let result = update_employee_admin(
            persistence,
            documents,
            &session.actor,
            employee_id,
            &mut form,
        );
        session.submit(result, || {
            employee_form_admin(persistence, &session.actor, employee_id)
        })
    })
    .await
}

/// Handler for POST `/admin/employees/{employee_id}/delete`.
pub async fn handle_delete_employee(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(employee_id): Path<i64>,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        session.action(delete_employee(
            persistence,
            documents,
            &session.actor,
            employee_id,
        ))
    })
    .await
}

/// Handler for GET `/admin/notifications`.
pub async fn handle_notifications(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(notifications(&mut persistence, &session.actor))
}

/// Handler for POST `/admin/notifications/{notification_id}/read`.
pub async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Path(notification_id): Path<i64>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.action(mark_notification_read(
        &mut persistence,
        &session.actor,
        notification_id,
    ))
}

/// Handler for GET `/admin/download-attendance`.
///
/// Without filters this shows the filter form; with filters it sends the
/// report, or the form again with a notice when nothing matched.
pub async fn handle_export_attendance(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    Query(query): Query<ExportQuery>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let result = export_attendance(
        &mut persistence,
        &session.actor,
        &query,
        OffsetDateTime::now_utc(),
    );
    drop(persistence);

    match result {
        Ok(ExportResponse::File(file)) => {
            info!(file_name = %file.file_name, "Attendance report exported");
            response::attachment(file)
        }
        Ok(ExportResponse::Form { view, notice }) => response::page_with(
            &session.cookies,
            StatusCode::OK,
            view,
            notice.into_iter().collect(),
            None,
        ),
        Err(err) => session.fail(err, RequestKind::Page),
    }
}

// ============================================================================
// Supervisor
// ============================================================================

/// Handler for GET `/supervisor/dashboard`.
///
/// A supervisor identity without a profile gets a `404` here rather than
/// the usual redirect back to this same page.
pub async fn handle_supervisor_dashboard(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    match supervisor_dashboard(&mut persistence, &session.actor) {
        Err(ApiError::MissingSupervisorProfile) => HttpError::new(
            StatusCode::NOT_FOUND,
            ApiError::MissingSupervisorProfile.to_string(),
        )
        .into_response(),
        result => session.page(result),
    }
}

/// Handler for GET `/supervisor/employee_list` and `/supervisor/my_employees`.
pub async fn handle_location_employees(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(location_employees(&mut persistence, &session.actor))
}

async fn render_attendance(
    app_state: AppState,
    session: SupervisorSession,
    week_offset: i64,
) -> Response {
    let today: Date = match current_date(&app_state) {
        Ok(today) => today,
        Err(err) => return session.fail(err, RequestKind::Page),
    };

    let mut persistence = app_state.persistence.lock().await;
    match attendance_page(&mut persistence, &session.actor, today, week_offset) {
        Ok(PageResponse::View(view)) => response::page(&session.cookies, view),
        Ok(PageResponse::Redirect(outcome)) => response::redirect(&session.cookies, outcome),
        Err(err) => session.fail(err, RequestKind::Page),
    }
}

async fn submit_attendance(
    app_state: AppState,
    session: SupervisorSession,
    week_offset: i64,
    form: &SubmittedForm,
) -> Response {
    let today: Date = match current_date(&app_state) {
        Ok(today) => today,
        Err(err) => return session.fail(err, RequestKind::Action),
    };

    let mut persistence = app_state.persistence.lock().await;
    session.action(mark_attendance(
        &mut persistence,
        &session.actor,
        today,
        week_offset,
        form,
    ))
}

/// Handler for GET `/supervisor/mark_attendance`.
pub async fn handle_attendance_page(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
) -> Response {
    render_attendance(app_state, session, 0).await
}

/// Handler for GET `/supervisor/mark_attendance/{week_offset}`.
pub async fn handle_attendance_week(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
    Path(week_offset): Path<i64>,
) -> Response {
    render_attendance(app_state, session, week_offset).await
}

/// Handler for POST `/supervisor/mark_attendance`.
///
/// Only today's column is read from the form.
pub async fn handle_mark_attendance(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
    FormData(form): FormData,
) -> Response {
    submit_attendance(app_state, session, 0, &form).await
}

/// Handler for POST `/supervisor/mark_attendance/{week_offset}`.
pub async fn handle_mark_attendance_week(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
    Path(week_offset): Path<i64>,
    FormData(form): FormData,
) -> Response {
    submit_attendance(app_state, session, week_offset, &form).await
}

/// Handler for GET `/supervisor/download_attendance`.
pub async fn handle_weekly_export(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
) -> Response {
    let today: Date = match current_date(&app_state) {
        Ok(today) => today,
        Err(err) => return session.fail(err, RequestKind::Page),
    };

    let mut persistence = app_state.persistence.lock().await;
    match weekly_export(&mut persistence, &session.actor, today) {
        Ok(file) => response::attachment(file),
        Err(err) => session.fail(err, RequestKind::Page),
    }
}

/// Handler for GET `/supervisor/add_employee`.
pub async fn handle_new_employee_form(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(employee_form_supervisor(
        &mut persistence,
        &session.actor,
        None,
    ))
}

/// Handler for POST `/supervisor/add_employee`.
pub async fn handle_add_employee(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
    FormData(mut form): FormData,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        let result = add_employee(
            persistence,
            documents,
            &session.actor,
            &mut form,
        );
        session.submit(result, || {
            employee_form_supervisor(persistence, &session.actor, None)
        })
    })
    .await
}

/// Handler for GET `/supervisor/edit_employee/{employee_id}`.
pub async fn handle_supervisor_employee_form(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
    Path(employee_id): Path<i64>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    session.page(employee_form_supervisor(
        &mut persistence,
        &session.actor,
        Some(employee_id),
    ))
}

/// Handler for POST `/supervisor/edit_employee/{employee_id}`.
pub async fn handle_supervisor_update_employee(
    AxumState(app_state): AxumState<AppState>,
    session: SupervisorSession,
    Path(employee_id): Path<i64>,
    FormData(mut form): FormData,
) -> Response {
    with_documents(&app_state, move |persistence, documents| {
        let result = edit_employee_supervisor(
            persistence,
            documents,
            &session.actor,
            employee_id,
            &mut form,
        );
        session.submit(result, || {
            employee_form_supervisor(persistence, &session.actor, Some(employee_id))
        })
    })
    .await
}
