// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization services.

use rollcall_domain::Role;
use rollcall_persistence::{
    EmployeeData, Persistence, PersistenceError, SessionData, SupervisorData, UserData,
};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// The reason shown for every failed credential check.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// An authenticated identity with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub user_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: Role,
}

impl AuthenticatedActor {
    #[must_use]
    pub fn from_user(user: &UserData) -> Self {
        Self {
            user_id: user.user_id,
            login_name: user.login_name.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
        }
    }
}

/// Authorization service for role and ownership checks.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor holds `required`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `required` - The role the action needs
    /// * `action` - The action name, reported on refusal
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor holds another role.
    pub fn require_role(
        actor: &AuthenticatedActor,
        required: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == required {
            return Ok(());
        }
        warn!(
            user_id = actor.user_id,
            action,
            required_role = required.as_str(),
            "Role check refused"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: required.as_str().to_string(),
        })
    }

    /// Checks that a supervisor may edit an employee.
    ///
    /// A supervisor may only edit employees at their own location.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for an employee at another location.
    pub fn authorize_employee_edit(
        supervisor: &SupervisorData,
        employee: &EmployeeData,
    ) -> Result<(), AuthError> {
        if supervisor.location_id == employee.location_id {
            return Ok(());
        }
        warn!(
            supervisor_id = supervisor.supervisor_id,
            employee_id = employee.employee_id,
            "Cross-location employee edit refused"
        );
        Err(AuthError::AccessDenied {
            message: format!(
                "Employee {} is not at the supervisor's location",
                employee.employee_id
            ),
        })
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Verifies credentials and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `login_name` - The login name, matched case-insensitively
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for an unknown login, a wrong password,
    /// or a database failure.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor), AuthError> {
        let Some(user) = persistence
            .get_user_by_login(login_name)
            .map_err(Self::map_persistence_error)?
        else {
            info!(login_name, "Login refused: unknown login");
            return Err(Self::invalid_credentials());
        };

        let verified: bool = Persistence::verify_password(password, &user.password_hash)
            .unwrap_or_else(|e| {
                warn!(user_id = user.user_id, error = %e, "Stored password hash is unreadable");
                false
            });
        if !verified {
            info!(user_id = user.user_id, "Login refused: wrong password");
            return Err(Self::invalid_credentials());
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String = (OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)
            .format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(user.user_id)
            .map_err(Self::map_persistence_error)?;

        info!(user_id = user.user_id, role = user.role.as_str(), "Login succeeded");
        Ok((session_token, AuthenticatedActor::from_user(&user)))
    }

    /// Validates a session token and returns its actor.
    ///
    /// An expired session is deleted. A live one has its activity stamped.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is unknown, expired, or
    /// its identity is gone.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Identity not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedActor::from_user(&user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    /// Picks the post-login destination.
    ///
    /// `next` is honoured only when it is a local path: it starts with `/`
    /// but not `//` or `/\`. Anything else lands on the role's dashboard.
    #[must_use]
    pub fn resolve_next(next: Option<&str>, role: Role) -> String {
        next.map(str::trim)
            .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.starts_with("/\\"))
            .map_or_else(|| role.dashboard_path().to_string(), ToString::to_string)
    }

    /// Generates a 256-bit hex session token.
    fn generate_session_token() -> String {
        let words: [u64; 4] = [
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
        ];
        words.iter().map(|w| format!("{w:016x}")).collect()
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from(INVALID_CREDENTIALS),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
