// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification log and dashboard aggregates.

use diesel::dsl::count;
use diesel::prelude::*;
use rollcall_domain::EmployeeStatus;
use tracing::debug;

use crate::data_models::{DashboardCounts, NotificationData};
use crate::diesel_schema::{employees, locations, notifications, supervisors};
use crate::error::PersistenceError;

backend_fn! {
/// Lists notifications, newest first, with employee names resolved.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_notifications(conn: &mut _) -> Result<Vec<NotificationData>, PersistenceError> {
    debug!("Listing notifications");

    let rows: Vec<(i64, String, i64, i32, String, String, String)> = notifications::table
        .inner_join(employees::table)
        .select((
            notifications::notification_id,
            notifications::kind,
            notifications::employee_id,
            notifications::is_read,
            notifications::created_at,
            employees::first_name,
            employees::last_name,
        ))
        .order_by(notifications::notification_id.desc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(notification_id, kind, employee_id, is_read, created_at, first, last)| {
                NotificationData {
                    notification_id,
                    kind,
                    employee_id,
                    employee_name: format!("{first} {last}"),
                    is_read: is_read != 0,
                    created_at,
                }
            },
        )
        .collect())
}
}

backend_fn! {
/// Counts the totals shown on the admin dashboard.
///
/// # Errors
///
/// Returns an error if any count query fails.
pub fn dashboard_counts(conn: &mut _) -> Result<DashboardCounts, PersistenceError> {
    let locations_count: i64 = locations::table
        .select(count(locations::location_id))
        .first(conn)?;
    let supervisors_count: i64 = supervisors::table
        .select(count(supervisors::supervisor_id))
        .first(conn)?;
    let employees_count: i64 = employees::table
        .select(count(employees::employee_id))
        .first(conn)?;
    let pending_employees_count: i64 = employees::table
        .filter(employees::status.eq(EmployeeStatus::Pending.as_str()))
        .select(count(employees::employee_id))
        .first(conn)?;
    let unread_notifications_count: i64 = notifications::table
        .filter(notifications::is_read.eq(0))
        .select(count(notifications::notification_id))
        .first(conn)?;

    Ok(DashboardCounts {
        locations: locations_count,
        supervisors: supervisors_count,
        employees: employees_count,
        pending_employees: pending_employees_count,
        unread_notifications: unread_notifications_count,
    })
}
}
