// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping API results onto HTTP responses.
//!
//! Pages render as a JSON envelope of `{"flashes": [...], "data": {...}}`.
//! Actions answer `303 See Other` with their flash queued in a cookie.
//! Failed form submissions answer `422` with the form's page model and
//! the per-field errors.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use rollcall_api::{
    ActionOutcome, ApiError, ExportFile, Flash, SUPERVISOR_EMPLOYEE_LIST_PATH,
};
use rollcall_domain::{FieldErrors, Role};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use tracing::{error, warn};

use crate::flash;

pub const NO_ACCESS_MESSAGE: &str = "You do not have access to that page.";
const CANNOT_EDIT_MESSAGE: &str = "You cannot edit this employee.";
const MISSING_PROFILE_MESSAGE: &str = "Supervisor profile or location not found.";
const NO_EMPLOYEES_MESSAGE: &str = "No employees found at your location.";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Whether a failure happened while rendering a page or running an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Page,
    Action,
}

/// The JSON envelope of every rendered page.
#[derive(Debug, Serialize)]
pub struct PageBody<T> {
    pub flashes: Vec<Flash>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Renders a page, draining queued flashes into it.
pub fn page<T: Serialize>(cookies: &Cookies, data: T) -> Response {
    page_with(cookies, StatusCode::OK, data, Vec::new(), None)
}

/// Renders a page with a status, extra flashes, and field errors.
pub fn page_with<T: Serialize>(
    cookies: &Cookies,
    status: StatusCode,
    data: T,
    extra: Vec<Flash>,
    errors: Option<FieldErrors>,
) -> Response {
    let mut flashes: Vec<Flash> = flash::take(cookies);
    flashes.extend(extra);
    (
        status,
        Json(PageBody {
            flashes,
            data,
            errors,
        }),
    )
        .into_response()
}

/// Queues an outcome's flash and redirects.
pub fn redirect(cookies: &Cookies, outcome: ActionOutcome) -> Response {
    if let Some(flash) = outcome.flash {
        flash::push(cookies, flash);
    }
    Redirect::to(&outcome.redirect).into_response()
}

fn redirect_with(cookies: &Cookies, flash: Flash, to: &str) -> Response {
    redirect(cookies, ActionOutcome::with_flash(flash, to))
}

/// Sends an export as a download.
pub fn attachment(file: ExportFile) -> Response {
    let disposition: String = format!("attachment; filename=\"{}\"", file.file_name);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

/// The per-field errors a failed form submission carries, if any.
pub fn form_errors(err: &ApiError) -> Option<FieldErrors> {
    match err {
        ApiError::ValidationFailed { errors } => Some(errors.clone()),
        ApiError::PasswordPolicyViolation { message } => {
            let mut errors: FieldErrors = FieldErrors::new();
            errors.add("password", message.clone());
            Some(errors)
        }
        ApiError::InvalidInput { field, message } => {
            let mut errors: FieldErrors = FieldErrors::new();
            errors.add(field, message.clone());
            Some(errors)
        }
        _ => None,
    }
}

/// Answers a failed form submission.
///
/// Field errors re-render the form's page model with `422`; any other
/// failure is mapped like an action error.
pub fn form_failure<T: Serialize>(
    cookies: &Cookies,
    role: Role,
    err: ApiError,
    form_page: impl FnOnce() -> Result<T, ApiError>,
) -> Response {
    let Some(errors) = form_errors(&err) else {
        return failure(cookies, role, err, RequestKind::Action);
    };
    match form_page() {
        Ok(data) => page_with(
            cookies,
            StatusCode::UNPROCESSABLE_ENTITY,
            data,
            Vec::new(),
            Some(errors),
        ),
        Err(page_err) => failure(cookies, role, page_err, RequestKind::Page),
    }
}

/// Maps an API error onto a response for a caller holding `role`.
pub fn failure(cookies: &Cookies, role: Role, err: ApiError, kind: RequestKind) -> Response {
    let dashboard: &str = role.dashboard_path();

    match err {
        ApiError::AuthenticationFailed { .. } => {
            HttpError::new(StatusCode::UNAUTHORIZED, err.to_string()).into_response()
        }
        ApiError::Unauthorized { .. } => {
            warn!(role = role.as_str(), error = %err, "Role refused");
            redirect_with(cookies, Flash::danger(NO_ACCESS_MESSAGE), dashboard)
        }
        ApiError::AccessDenied { .. } => {
            warn!(error = %err, "Ownership check refused");
            redirect_with(
                cookies,
                Flash::danger(CANNOT_EDIT_MESSAGE),
                SUPERVISOR_EMPLOYEE_LIST_PATH,
            )
        }
        ApiError::MissingSupervisorProfile => {
            redirect_with(cookies, Flash::danger(MISSING_PROFILE_MESSAGE), dashboard)
        }
        ApiError::NoEmployeesAtLocation => {
            redirect_with(cookies, Flash::warning(NO_EMPLOYEES_MESSAGE), dashboard)
        }
        ApiError::ResourceNotFound { .. } => {
            HttpError::new(StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        ApiError::ValidationFailed { .. }
        | ApiError::PasswordPolicyViolation { .. }
        | ApiError::InvalidInput { .. } => {
            let errors: Option<FieldErrors> = form_errors(&err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(PageBody {
                    flashes: flash::take(cookies),
                    data: ErrorResponse {
                        error: true,
                        message: err.to_string(),
                    },
                    errors,
                }),
            )
                .into_response()
        }
        ApiError::DuplicateResource { message, .. } => {
            redirect_with(cookies, Flash::warning(message), dashboard)
        }
        ApiError::DomainRuleViolation { message, .. } => {
            redirect_with(cookies, Flash::danger(message), dashboard)
        }
        ApiError::Internal { ref message } => {
            error!(error = %message, "Request failed");
            match kind {
                RequestKind::Page => {
                    HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE)
                        .into_response()
                }
                RequestKind::Action => {
                    redirect_with(cookies, Flash::danger(UNEXPECTED_MESSAGE), dashboard)
                }
            }
        }
    }
}
