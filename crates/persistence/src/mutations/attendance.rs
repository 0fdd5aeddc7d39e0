// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Applying attendance marks to the ledger.

use diesel::prelude::*;
use rollcall::{MarkDecision, MarkPlan};
use rollcall_domain::{AttendanceStatus, format_iso_date};
use tracing::info;

use crate::diesel_schema::attendance;
use crate::error::PersistenceError;
use crate::mutations::now_timestamp;

backend_fn! {
/// Applies a mark plan to the ledger in one transaction.
///
/// `Record` decisions update the existing (employee, date) row or insert
/// one. `ClearIfRecorded` resets an existing row to `Absent / 0` and
/// writes nothing when no row exists. Any failure rolls back the batch.
///
/// # Returns
///
/// The number of rows inserted or updated.
///
/// # Errors
///
/// Returns an error if any read or write fails.
pub fn mark_attendance(conn: &mut _, plan: &MarkPlan) -> Result<usize, PersistenceError> {
    let date: String = format_iso_date(plan.date);
    let marked_at: String = now_timestamp()?;

    let (inserted, updated): (usize, usize) =
        conn.transaction::<_, PersistenceError, _>(|conn| {
            let mut inserted: usize = 0;
            let mut updated: usize = 0;

            for decision in &plan.decisions {
                let employee_id: i64 = decision.employee_id();
                let existing: Option<i64> = attendance::table
                    .filter(attendance::employee_id.eq(employee_id))
                    .filter(attendance::date.eq(&date))
                    .select(attendance::attendance_id)
                    .first(conn)
                    .optional()?;

                let (status, overtime_hours): (AttendanceStatus, f64) = match decision {
                    MarkDecision::Record {
                        status,
                        overtime_hours,
                        ..
                    } => (*status, *overtime_hours),
                    MarkDecision::ClearIfRecorded { .. } => {
                        if existing.is_none() {
                            continue;
                        }
                        (AttendanceStatus::Absent, 0.0)
                    }
                };

                if let Some(attendance_id) = existing {
                    diesel::update(attendance::table)
                        .filter(attendance::attendance_id.eq(attendance_id))
                        .set((
                            attendance::status.eq(status.as_str()),
                            attendance::overtime_hours.eq(overtime_hours),
                            attendance::marked_by.eq(Some(plan.marked_by)),
                            attendance::marked_at.eq(&marked_at),
                        ))
                        .execute(conn)?;
                    updated += 1;
                } else {
                    diesel::insert_into(attendance::table)
                        .values((
                            attendance::employee_id.eq(employee_id),
                            attendance::date.eq(&date),
                            attendance::status.eq(status.as_str()),
                            attendance::overtime_hours.eq(overtime_hours),
                            attendance::marked_by.eq(Some(plan.marked_by)),
                            attendance::marked_at.eq(&marked_at),
                        ))
                        .execute(conn)?;
                    inserted += 1;
                }
            }

            Ok((inserted, updated))
        })?;

    info!(
        date = %date,
        marked_by = plan.marked_by,
        inserted,
        updated,
        "Attendance marked"
    );
    Ok(inserted + updated)
}
}
