// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turning submitted input into state changes.
//!
//! `apply_marks` converts a submitted attendance form into a [`MarkPlan`]
//! the persistence layer executes in one transaction. `apply_review`
//! decides the lifecycle transition for an approval action.

use rollcall_domain::{AttendanceStatus, EmployeeStatus, ReviewAction, format_iso_date};
use time::Date;

use crate::error::CoreError;

/// Form field carrying the presence checkbox for one employee and date.
#[must_use]
pub fn presence_field(employee_id: i64, date: Date) -> String {
    format!("attendance_{employee_id}_{}", format_iso_date(date))
}

/// Form field carrying the overtime hours for one employee and date.
#[must_use]
pub fn overtime_field(employee_id: i64, date: Date) -> String {
    format!("overtime_{employee_id}_{}", format_iso_date(date))
}

/// Parses submitted overtime hours.
///
/// Missing, unparseable, negative, and non-finite values all count as zero.
#[must_use]
pub fn parse_overtime(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .unwrap_or(0.0)
}

/// What to do for one employee on the marked date.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkDecision {
    /// Insert or update the employee's record for the date.
    Record {
        employee_id: i64,
        status: AttendanceStatus,
        overtime_hours: f64,
    },
    /// Absent with no overtime: create nothing, but reset an existing
    /// record for the date back to `Absent / 0`.
    ClearIfRecorded { employee_id: i64 },
}

impl MarkDecision {
    #[must_use]
    pub const fn employee_id(&self) -> i64 {
        match self {
            Self::Record { employee_id, .. } | Self::ClearIfRecorded { employee_id } => {
                *employee_id
            }
        }
    }
}

/// The full set of writes produced by one attendance submission.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPlan {
    /// The only date written; always the local today.
    pub date: Date,
    /// Identity recorded as the marker.
    pub marked_by: i64,
    pub decisions: Vec<MarkDecision>,
}

impl MarkPlan {
    /// Number of decisions that write a record.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, MarkDecision::Record { .. }))
            .count()
    }
}

/// Builds the write plan for an attendance submission.
///
/// Only `date` is considered; fields for other days are ignored even if
/// present. Presence is the existence of the checkbox field.
///
/// # Arguments
///
/// * `date` - The local today
/// * `marked_by` - The identity submitting the form
/// * `employee_ids` - Employees at the supervisor's location
/// * `lookup` - Returns the submitted value for a form field name
///
/// # Errors
///
/// Returns `CoreError::EmptyRoster` if there are no employees to mark.
pub fn apply_marks<'a, F>(
    date: Date,
    marked_by: i64,
    employee_ids: &[i64],
    lookup: F,
) -> Result<MarkPlan, CoreError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    if employee_ids.is_empty() {
        return Err(CoreError::EmptyRoster);
    }

    let decisions: Vec<MarkDecision> = employee_ids
        .iter()
        .map(|&employee_id| {
            let is_present: bool = lookup(&presence_field(employee_id, date)).is_some();
            let overtime_hours: f64 = parse_overtime(lookup(&overtime_field(employee_id, date)));

            if !is_present && overtime_hours <= 0.0 {
                MarkDecision::ClearIfRecorded { employee_id }
            } else {
                MarkDecision::Record {
                    employee_id,
                    status: AttendanceStatus::from_presence(is_present),
                    overtime_hours,
                }
            }
        })
        .collect();

    Ok(MarkPlan {
        date,
        marked_by,
        decisions,
    })
}

/// A decided lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub action: ReviewAction,
    pub previous: EmployeeStatus,
    pub next: EmployeeStatus,
}

/// Decides the transition for an approval action.
///
/// # Returns
///
/// `None` when the action is not `accept` or `reject`; the caller leaves
/// the employee untouched.
#[must_use]
pub fn apply_review(current: EmployeeStatus, action: &str) -> Option<ReviewOutcome> {
    ReviewAction::parse(action).map(|action| ReviewOutcome {
        action,
        previous: current,
        next: action.target_status(),
    })
}
