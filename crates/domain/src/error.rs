// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The role string is not a known role.
    InvalidRole(String),
    /// The employee status string is not a known lifecycle status.
    InvalidEmployeeStatus(String),
    /// The attendance status string is not `Present` or `Absent`.
    InvalidAttendanceStatus(String),
    /// The document kind is not one of the four document slots.
    InvalidDocumentKind(String),
    /// Week offsets before the current week are not browsable.
    NegativeWeekOffset(i64),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that overflowed.
        operation: String,
    },
    /// A date string could not be parsed as `YYYY-MM-DD`.
    InvalidDate(String),
    /// The timezone name is not a known IANA timezone.
    InvalidTimezone(String),
    /// The location name is empty or outside the allowed length.
    InvalidLocationName(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidEmployeeStatus(status) => {
                write!(f, "Invalid employee status: {status}")
            }
            Self::InvalidAttendanceStatus(status) => {
                write!(f, "Invalid attendance status: {status}")
            }
            Self::InvalidDocumentKind(kind) => write!(f, "Invalid document kind: {kind}"),
            Self::NegativeWeekOffset(offset) => {
                write!(f, "Week offset {offset} is before the current week")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow: {operation}")
            }
            Self::InvalidDate(value) => write!(f, "Invalid date '{value}', expected YYYY-MM-DD"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::InvalidLocationName(msg) => write!(f, "Invalid location name: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
