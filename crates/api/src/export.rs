// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV rendering of attendance exports.

use rollcall::{EXPORT_COLUMNS, ExportRecord, WeeklySheet};

use crate::error::ApiError;

/// `Content-Type` of every export.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renders the admin attendance report.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_report(records: &[ExportRecord]) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(EXPORT_COLUMNS).map_err(|e| csv_error(&e))?;
    for record in records {
        writer.write_record(record.to_row()).map_err(|e| csv_error(&e))?;
    }

    writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to finish CSV export: {e}"),
    })
}

/// Renders a supervisor's weekly sheet.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_weekly_sheet(sheet: &WeeklySheet) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&sheet.header).map_err(|e| csv_error(&e))?;
    for row in &sheet.rows {
        writer.write_record(row).map_err(|e| csv_error(&e))?;
    }

    writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to finish CSV export: {e}"),
    })
}

fn csv_error(err: &csv::Error) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write CSV export: {err}"),
    }
}
