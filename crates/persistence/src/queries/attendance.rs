// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance ledger reads.

use std::collections::HashMap;

use diesel::prelude::*;
use rollcall::{ExportFilter, ExportRecord, LedgerEntry, sort_records};
use rollcall_domain::{format_iso_date, parse_iso_date};
use time::Date;
use tracing::debug;

use crate::diesel_schema::{attendance, employees, locations, supervisors};
use crate::error::PersistenceError;
use crate::queries::contains_pattern;

type ExportRow = (String, String, f64, String, String, String, i64, i64);

backend_fn! {
/// Loads ledger rows for the given employees between two dates, inclusive.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed.
pub fn week_ledger(
    conn: &mut _,
    employee_ids: &[i64],
    from: Date,
    to: Date,
) -> Result<Vec<LedgerEntry>, PersistenceError> {
    debug!(
        employees = employee_ids.len(),
        from = %from,
        to = %to,
        "Loading attendance ledger"
    );

    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(i64, String, String, f64)> = attendance::table
        .filter(attendance::employee_id.eq_any(employee_ids))
        .filter(attendance::date.ge(format_iso_date(from)))
        .filter(attendance::date.le(format_iso_date(to)))
        .select((
            attendance::employee_id,
            attendance::date,
            attendance::status,
            attendance::overtime_hours,
        ))
        .order_by((attendance::date.asc(), attendance::employee_id.asc()))
        .load(conn)?;

    let mut ledger: Vec<LedgerEntry> = Vec::with_capacity(rows.len());
    for (employee_id, date, status, overtime_hours) in rows {
        ledger.push(LedgerEntry {
            employee_id,
            date: parse_iso_date(&date)?,
            status: status.parse()?,
            overtime_hours,
        });
    }
    Ok(ledger)
}
}

backend_fn! {
/// Projects ledger rows matching `filter` into admin report records,
/// ordered by date then employee name.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed.
pub fn export_attendance(
    conn: &mut _,
    filter: &ExportFilter,
) -> Result<Vec<ExportRecord>, PersistenceError> {
    debug!(?filter, "Exporting attendance");

    let mut query = attendance::table
        .inner_join(employees::table)
        .select((
            attendance::date,
            attendance::status,
            attendance::overtime_hours,
            employees::first_name,
            employees::last_name,
            employees::employee_code,
            employees::location_id,
            employees::supervisor_id,
        ))
        .into_boxed();

    if let Some(supervisor_id) = filter.supervisor_id {
        query = query.filter(employees::supervisor_id.eq(supervisor_id));
    }
    if let Some(location_id) = filter.location_id {
        query = query.filter(employees::location_id.eq(location_id));
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern: String = contains_pattern(term);
        query = query.filter(
            employees::first_name
                .like(pattern.clone())
                .escape('\\')
                .or(employees::last_name.like(pattern.clone()).escape('\\'))
                .or(employees::phone.like(pattern.clone()).escape('\\'))
                .or(employees::aadhaar_no.like(pattern).escape('\\')),
        );
    }
    if let Some(from) = filter.from_date {
        query = query.filter(attendance::date.ge(format_iso_date(from)));
    }
    if let Some(to) = filter.to_date {
        query = query.filter(attendance::date.le(format_iso_date(to)));
    }

    let rows: Vec<ExportRow> = query.load(conn)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let location_names: HashMap<i64, String> = locations::table
        .select((locations::location_id, locations::name))
        .load::<(i64, String)>(conn)?
        .into_iter()
        .collect();
    let supervisor_names: HashMap<i64, String> = supervisors::table
        .select((
            supervisors::supervisor_id,
            supervisors::first_name,
            supervisors::last_name,
        ))
        .load::<(i64, String, String)>(conn)?
        .into_iter()
        .map(|(id, first, last)| (id, format!("{first} {last}")))
        .collect();

    let mut records: Vec<ExportRecord> = Vec::with_capacity(rows.len());
    for (date, status, overtime_hours, first, last, code, location_id, supervisor_id) in rows {
        records.push(ExportRecord {
            date: parse_iso_date(&date)?,
            employee_name: format!("{first} {last}"),
            employee_code: code,
            location: location_names
                .get(&location_id)
                .cloned()
                .unwrap_or_default(),
            supervisor: supervisor_names
                .get(&supervisor_id)
                .cloned()
                .unwrap_or_default(),
            status: status.parse()?,
            overtime_hours,
        });
    }

    sort_records(&mut records);
    debug!(records = records.len(), "Attendance export assembled");
    Ok(records)
}
}
