// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Export projections.
//!
//! The admin report is a flat list of ledger rows joined with their
//! employee, location, and supervisor names. The supervisor sheet pivots
//! one week of one location into a row per employee.

use std::collections::HashMap;

use rollcall_domain::{AttendanceStatus, AttendanceWeek, format_iso_date, parse_iso_date};
use time::{Date, OffsetDateTime};

use crate::grid::{LedgerEntry, RosterEntry};

/// Column headings of the admin attendance report, in order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Date",
    "Employee Name",
    "Employee Code",
    "Location",
    "Supervisor",
    "Status",
    "Overtime Hours",
];

/// Filters accepted by the admin attendance report.
///
/// Empty strings and values that fail to parse are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    pub supervisor_id: Option<i64>,
    pub location_id: Option<i64>,
    /// Case-insensitive substring over first name, last name, phone, and
    /// Aadhaar number.
    pub search: Option<String>,
    /// Inclusive lower bound on the record date.
    pub from_date: Option<Date>,
    /// Inclusive upper bound on the record date.
    pub to_date: Option<Date>,
}

impl ExportFilter {
    /// Builds a filter from raw query-string values.
    #[must_use]
    pub fn from_query(
        supervisor_id: Option<&str>,
        location_id: Option<&str>,
        search: Option<&str>,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Self {
        let id = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        let date = |raw: Option<&str>| raw.and_then(|v| parse_iso_date(v).ok());

        Self {
            supervisor_id: id(supervisor_id),
            location_id: id(location_id),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            from_date: date(from_date),
            to_date: date(to_date),
        }
    }

    /// True when no filter was supplied; the report page shows the form
    /// instead of producing a file.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.supervisor_id.is_none()
            && self.location_id.is_none()
            && self.search.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
    }
}

/// One row of the admin attendance report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub date: Date,
    pub employee_name: String,
    pub employee_code: String,
    pub location: String,
    pub supervisor: String,
    pub status: AttendanceStatus,
    pub overtime_hours: f64,
}

impl ExportRecord {
    /// Renders the record in `EXPORT_COLUMNS` order.
    #[must_use]
    pub fn to_row(&self) -> [String; 7] {
        [
            format_iso_date(self.date),
            self.employee_name.clone(),
            self.employee_code.clone(),
            self.location.clone(),
            self.supervisor.clone(),
            self.status.to_string(),
            self.overtime_hours.to_string(),
        ]
    }
}

/// Orders records by date, then employee name.
pub fn sort_records(records: &mut [ExportRecord]) {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.employee_name.cmp(&b.employee_name))
    });
}

/// File name for an admin report generated at `now`.
#[must_use]
pub fn report_file_name(now: OffsetDateTime) -> String {
    format!(
        "attendance_report_{:04}{:02}{:02}_{:02}{:02}{:02}.csv",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// One location's week pivoted into a row per employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WeeklySheet {
    /// File name offered for the weekly download.
    pub const FILE_NAME: &'static str = "attendance.csv";

    /// Builds the sheet.
    ///
    /// Columns are `Name`, `Location`, then one per day labelled like
    /// `Monday (13-Oct)`. Days without a record are left blank.
    #[must_use]
    pub fn build(
        week: &AttendanceWeek,
        location_name: &str,
        roster: &[RosterEntry],
        ledger: &[LedgerEntry],
    ) -> Self {
        let mut header: Vec<String> = vec![String::from("Name"), String::from("Location")];
        header.extend(week.days().iter().map(|d| AttendanceWeek::day_label(*d)));

        let by_key: HashMap<(i64, Date), AttendanceStatus> = ledger
            .iter()
            .map(|entry| ((entry.employee_id, entry.date), entry.status))
            .collect();

        let rows: Vec<Vec<String>> = roster
            .iter()
            .map(|employee| {
                let mut row: Vec<String> =
                    vec![employee.display_name.clone(), location_name.to_string()];
                row.extend(week.days().iter().map(|day| {
                    by_key
                        .get(&(employee.employee_id, *day))
                        .map_or_else(String::new, ToString::to_string)
                }));
                row
            })
            .collect();

        Self { header, rows }
    }
}
