// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use rollcall_domain::{AttendanceStatus, AttendanceWeek};
use serde::Serialize;
use time::Date;

/// An employee shown on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub employee_id: i64,
    pub display_name: String,
    pub employee_code: String,
}

/// A stored attendance record, as the grid needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub employee_id: i64,
    pub date: Date,
    pub status: AttendanceStatus,
    pub overtime_hours: f64,
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceCell {
    pub status: AttendanceStatus,
    pub overtime_hours: f64,
    /// Whether a ledger row backs this cell. Unbacked cells show the
    /// `Absent / 0` default.
    pub recorded: bool,
}

impl AttendanceCell {
    const EMPTY: Self = Self {
        status: AttendanceStatus::Absent,
        overtime_hours: 0.0,
        recorded: false,
    };
}

/// One employee's row: a cell per day of the week, Monday first.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub employee: RosterEntry,
    pub cells: Vec<(Date, AttendanceCell)>,
}

/// The weekly attendance grid for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceGrid {
    week: AttendanceWeek,
    editable_date: Date,
    rows: Vec<GridRow>,
}

impl AttendanceGrid {
    /// Builds the grid for a roster and the ledger rows of one week.
    ///
    /// Every roster entry gets one row and every row gets exactly one cell
    /// per week day. Ledger rows outside the week or for employees not on
    /// the roster are ignored. Row order follows the roster.
    ///
    /// # Arguments
    ///
    /// * `week` - The week being displayed
    /// * `editable_date` - Today; the only column that accepts writes
    /// * `roster` - Employees at the location, in display order
    /// * `ledger` - Stored records for the roster within the week
    #[must_use]
    pub fn assemble(
        week: AttendanceWeek,
        editable_date: Date,
        roster: &[RosterEntry],
        ledger: &[LedgerEntry],
    ) -> Self {
        let by_key: HashMap<(i64, Date), &LedgerEntry> = ledger
            .iter()
            .filter(|entry| week.contains(entry.date))
            .map(|entry| ((entry.employee_id, entry.date), entry))
            .collect();

        let rows: Vec<GridRow> = roster
            .iter()
            .map(|employee| {
                let cells: Vec<(Date, AttendanceCell)> = week
                    .days()
                    .iter()
                    .map(|day| {
                        let cell: AttendanceCell = by_key
                            .get(&(employee.employee_id, *day))
                            .map_or(AttendanceCell::EMPTY, |entry| AttendanceCell {
                                status: entry.status,
                                overtime_hours: entry.overtime_hours,
                                recorded: true,
                            });
                        (*day, cell)
                    })
                    .collect();
                GridRow {
                    employee: employee.clone(),
                    cells,
                }
            })
            .collect();

        Self {
            week,
            editable_date,
            rows,
        }
    }

    #[must_use]
    pub const fn week(&self) -> &AttendanceWeek {
        &self.week
    }

    #[must_use]
    pub const fn editable_date(&self) -> Date {
        self.editable_date
    }

    /// Whether the editable column falls inside the displayed week.
    #[must_use]
    pub fn shows_editable_column(&self) -> bool {
        self.week.contains(self.editable_date)
    }

    #[must_use]
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Looks up a single cell.
    #[must_use]
    pub fn cell(&self, employee_id: i64, date: Date) -> Option<&AttendanceCell> {
        self.rows
            .iter()
            .find(|row| row.employee.employee_id == employee_id)
            .and_then(|row| row.cells.iter().find(|(d, _)| *d == date))
            .map(|(_, cell)| cell)
    }
}
