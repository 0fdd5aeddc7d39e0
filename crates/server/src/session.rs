// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and role gates for the server.
//!
//! The session token lives in an HttpOnly cookie. A single extractor,
//! [`RoleGate`], validates it and checks the caller's role before any
//! handler runs; [`AdminSession`], [`SupervisorSession`], and
//! [`AnySession`] are its instances.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use rollcall_api::{
    ActionOutcome, ApiError, AuthenticatedActor, AuthenticationService, Flash, LOGIN_PATH,
};
use rollcall_domain::Role;
use serde::Serialize;
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time::Duration},
};
use tracing::{debug, warn};

use crate::AppState;
use crate::flash;
use crate::response::{self, NO_ACCESS_MESSAGE, RequestKind};

pub const SESSION_COOKIE_NAME: &str = "rollcall_session";

/// Sessions and their cookie live for 30 days.
const SESSION_MAX_AGE: Duration = Duration::days(30);

/// Which roles a [`RoleGate`] admits.
pub trait RoleRequirement: Send + Sync + 'static {
    fn permits(role: Role) -> bool;
}

/// Admits administrators.
pub struct AdminOnly;

impl RoleRequirement for AdminOnly {
    fn permits(role: Role) -> bool {
        role == Role::Admin
    }
}

/// Admits supervisors.
pub struct SupervisorOnly;

impl RoleRequirement for SupervisorOnly {
    fn permits(role: Role) -> bool {
        role == Role::Supervisor
    }
}

/// Admits any signed-in identity.
pub struct AnyRole;

impl RoleRequirement for AnyRole {
    fn permits(_role: Role) -> bool {
        true
    }
}

/// Extractor for an authenticated caller holding the role `R` admits.
///
/// # Usage
///
/// ```ignore
/// async fn handler(
///     AxumState(app_state): AxumState<AppState>,
///     session: AdminSession,
/// ) -> Response {
///     let mut persistence = app_state.persistence.lock().await;
///     session.page(admin_dashboard(&mut persistence, &session.actor))
/// }
/// ```
///
/// # Rejections
///
/// - No valid session: `303` to `/login?next=<path and query>`.
/// - Wrong role: a danger flash and `303` to the caller's own dashboard.
pub struct RoleGate<R> {
    pub actor: AuthenticatedActor,
    pub session_token: String,
    pub cookies: Cookies,
    requirement: PhantomData<fn() -> R>,
}

pub type AdminSession = RoleGate<AdminOnly>;
pub type SupervisorSession = RoleGate<SupervisorOnly>;
pub type AnySession = RoleGate<AnyRole>;

impl<R: RoleRequirement> FromRequestParts<AppState> for RoleGate<R> {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies: Cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(status, message)| SessionRejection::Misconfigured { status, message })?;

        let next: String = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());

        let Some((actor, session_token)) = authenticate(state, &cookies).await else {
            debug!(next = %next, "No session; sending to login");
            return Err(SessionRejection::LoginRequired { next });
        };

        if !R::permits(actor.role) {
            warn!(
                login_name = %actor.login_name,
                role = actor.role.as_str(),
                path = %parts.uri.path(),
                "Role gate refused"
            );
            flash::push(&cookies, Flash::danger(NO_ACCESS_MESSAGE));
            return Err(SessionRejection::WrongRole {
                dashboard: actor.role.dashboard_path(),
            });
        }

        Ok(Self {
            actor,
            session_token,
            cookies,
            requirement: PhantomData,
        })
    }
}

impl<R> RoleGate<R> {
    /// Renders a page result for this caller.
    pub fn page<T: Serialize>(&self, result: Result<T, ApiError>) -> Response {
        match result {
            Ok(data) => response::page(&self.cookies, data),
            Err(err) => self.fail(err, RequestKind::Page),
        }
    }

    /// Redirects after an action, or maps its failure.
    pub fn action(&self, result: Result<ActionOutcome, ApiError>) -> Response {
        match result {
            Ok(outcome) => response::redirect(&self.cookies, outcome),
            Err(err) => self.fail(err, RequestKind::Action),
        }
    }

    /// Redirects after a form action, re-rendering the form on field errors.
    pub fn submit<T: Serialize>(
        &self,
        result: Result<ActionOutcome, ApiError>,
        form_page: impl FnOnce() -> Result<T, ApiError>,
    ) -> Response {
        match result {
            Ok(outcome) => response::redirect(&self.cookies, outcome),
            Err(err) => response::form_failure(&self.cookies, self.actor.role, err, form_page),
        }
    }

    pub fn fail(&self, err: ApiError, kind: RequestKind) -> Response {
        response::failure(&self.cookies, self.actor.role, err, kind)
    }
}

/// Resolves the caller from the session cookie.
///
/// A cookie naming an unknown or expired session is cleared.
pub async fn authenticate(
    state: &AppState,
    cookies: &Cookies,
) -> Option<(AuthenticatedActor, String)> {
    let token: String = cookies.get(SESSION_COOKIE_NAME)?.value().to_string();

    let mut persistence = state.persistence.lock().await;
    match AuthenticationService::validate_session(&mut persistence, &token) {
        Ok(actor) => Some((actor, token)),
        Err(e) => {
            debug!(error = %e, "Session cookie rejected");
            end(cookies);
            None
        }
    }
}

/// Sets the session cookie after a successful login.
pub fn begin(cookies: &Cookies, session_token: String) {
    cookies.add(
        Cookie::build((SESSION_COOKIE_NAME, session_token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(SESSION_MAX_AGE)
            .build(),
    );
}

/// Clears the session cookie.
pub fn end(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build());
}

/// Session extraction rejections.
#[derive(Debug)]
pub enum SessionRejection {
    /// No valid session; the caller should log in and return to `next`.
    LoginRequired { next: String },
    /// Signed in, but not with a role this route admits.
    WrongRole { dashboard: &'static str },
    /// The cookie layer is missing from the router.
    Misconfigured {
        status: StatusCode,
        message: &'static str,
    },
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::LoginRequired { next } => {
                let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
                Redirect::to(&format!("{LOGIN_PATH}?next={encoded}")).into_response()
            }
            Self::WrongRole { dashboard } => Redirect::to(dashboard).into_response(),
            Self::Misconfigured { status, message } => (status, message).into_response(),
        }
    }
}
