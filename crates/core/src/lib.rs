// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance workflow core.
//!
//! Pure functions that turn roster and ledger data into the weekly grid,
//! turn a submitted attendance form into a write plan, decide approval
//! transitions, and project ledger rows into export records. Nothing here
//! touches storage; the persistence and API layers feed it data and act on
//! its results.

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

mod apply;
mod error;
mod export;
mod grid;

#[cfg(test)]
mod tests;

pub use apply::{
    MarkDecision, MarkPlan, ReviewOutcome, apply_marks, apply_review, overtime_field,
    parse_overtime, presence_field,
};
pub use error::CoreError;
pub use export::{
    EXPORT_COLUMNS, ExportFilter, ExportRecord, WeeklySheet, report_file_name, sort_records,
};
pub use grid::{AttendanceCell, AttendanceGrid, GridRow, LedgerEntry, RosterEntry};
