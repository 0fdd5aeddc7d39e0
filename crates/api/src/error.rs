// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use rollcall::CoreError;
use rollcall_domain::{DomainError, FieldErrors};
use rollcall_persistence::PersistenceError;

use crate::documents::DocumentError;
use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role does not permit the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The actor holds the right role but not the resource.
    AccessDenied {
        /// A human-readable description of the refusal.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::AccessDenied { message } => write!(f, "Access denied: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have the required role.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The actor may not touch this particular resource.
    AccessDenied {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// One or more form fields failed validation.
    ValidationFailed {
        /// Messages keyed by field name.
        errors: FieldErrors,
    },
    /// A resource with the same identity already exists.
    DuplicateResource {
        /// The type of resource.
        resource_type: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// The supervisor identity has no profile or the profile has no location.
    MissingSupervisorProfile,
    /// There is nobody at the supervisor's location to mark.
    NoEmployeesAtLocation,
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::AccessDenied { message } => write!(f, "Access denied: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ValidationFailed { errors } => write!(f, "Validation failed: {errors}"),
            Self::DuplicateResource {
                resource_type,
                message,
            } => write!(f, "Duplicate {resource_type}: {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::MissingSupervisorProfile => {
                write!(f, "Supervisor profile or location not found")
            }
            Self::NoEmployeesAtLocation => write!(f, "No employees found at your location"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
            AuthError::AccessDenied { message } => Self::AccessDenied { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::ValidationFailed { errors }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidLocationName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidDate(value) => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Not a valid date: {value}"),
        },
        DomainError::InvalidDocumentKind(kind) => ApiError::InvalidInput {
            field: String::from("document"),
            message: format!("Unknown document kind: {kind}"),
        },
        DomainError::NegativeWeekOffset(offset) => ApiError::DomainRuleViolation {
            rule: String::from("week_offset_not_negative"),
            message: format!("Week offset {offset} is before the current week"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::DomainRuleViolation {
            rule: String::from("week_in_calendar_range"),
            message: format!("Date out of range: {operation}"),
        },
        DomainError::InvalidTimezone(_)
        | DomainError::InvalidRole(_)
        | DomainError::InvalidEmployeeStatus(_)
        | DomainError::InvalidAttendanceStatus(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::EmptyRoster => ApiError::NoEmployeesAtLocation,
    }
}

/// Translates a persistence error into an API error.
///
/// # Arguments
///
/// * `err` - The persistence error
/// * `resource_type` - What the failed operation was working on
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::UniqueViolation(message) => ApiError::DuplicateResource {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::SupervisorHasEmployees {
            supervisor_id,
            employee_count,
        } => ApiError::DomainRuleViolation {
            rule: String::from("supervisor_without_employees"),
            message: format!(
                "Supervisor {supervisor_id} still has {employee_count} employee(s) assigned. Reassign or delete them first."
            ),
        },
        other => ApiError::Internal {
            message: format!("{resource_type}: {other}"),
        },
    }
}
