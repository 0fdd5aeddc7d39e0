// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain vocabulary for the Rollcall attendance system.
//!
//! This crate owns the types every other layer agrees on: identity roles,
//! the employee lifecycle, attendance presence, document slots, ISO week
//! arithmetic, and the declarative field rules used to validate forms.
//! It performs no I/O.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod types;
mod validation;
mod week;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use types::{
    ALLOWED_DOCUMENT_EXTENSIONS, AttendanceStatus, DocumentKind, EmployeeStatus, ReviewAction,
    Role,
};
pub use validation::{
    EMPLOYEE_FIELDS, FieldErrors, FieldRule, FieldDef, LOCATION_FIELDS, SUPERVISOR_FIELDS,
    normalize_location_name, validate_fields,
};
pub use week::{
    AttendanceWeek, DAYS_PER_WEEK, format_iso_date, local_today, parse_iso_date, week_of_month,
};
