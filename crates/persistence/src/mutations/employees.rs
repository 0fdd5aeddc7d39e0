// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee registry mutations.

use diesel::prelude::*;
use rollcall_domain::{EmployeeStatus, format_iso_date};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{DocumentPaths, PersonProfile};
use crate::diesel_schema::{employees, notifications};
use crate::error::PersistenceError;

/// Notification kind appended when a supervisor adds an employee.
pub const EMPLOYEE_PENDING: &str = "employee_pending";

#[derive(Insertable)]
#[diesel(table_name = employees)]
struct NewEmployeeRow<'a> {
    supervisor_id: i64,
    location_id: i64,
    status: &'a str,
    first_name: &'a str,
    middle_name: Option<&'a str>,
    last_name: &'a str,
    dob: String,
    doj: String,
    phone: &'a str,
    employee_code: &'a str,
    designation: &'a str,
    aadhaar_no: &'a str,
    pan_no: &'a str,
    account_number: &'a str,
    ifsc: &'a str,
    bank_name: &'a str,
    profile_image: Option<&'a str>,
    aadhaar_image: Option<&'a str>,
    pan_image: Option<&'a str>,
    passbook_image: Option<&'a str>,
    current_address: &'a str,
    permanent_address: &'a str,
}

/// Profile update. `None` document slots keep the stored path.
#[derive(AsChangeset)]
#[diesel(table_name = employees)]
struct EmployeeChanges<'a> {
    supervisor_id: i64,
    location_id: i64,
    first_name: &'a str,
    middle_name: Option<Option<&'a str>>,
    last_name: &'a str,
    dob: String,
    doj: String,
    phone: &'a str,
    employee_code: &'a str,
    designation: &'a str,
    aadhaar_no: &'a str,
    pan_no: &'a str,
    account_number: &'a str,
    ifsc: &'a str,
    bank_name: &'a str,
    profile_image: Option<&'a str>,
    aadhaar_image: Option<&'a str>,
    pan_image: Option<&'a str>,
    passbook_image: Option<&'a str>,
    current_address: &'a str,
    permanent_address: &'a str,
}

backend_fn! {
/// Creates a pending employee and appends an `employee_pending`
/// notification, atomically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `supervisor_id` - The creating supervisor
/// * `location_id` - The employee's location
/// * `person` - Profile fields
/// * `documents` - Stored document paths
///
/// # Returns
///
/// The new employee id.
///
/// # Errors
///
/// Returns an error if either insert fails; nothing is written then.
pub fn create_employee(
    conn: &mut _,
    supervisor_id: i64,
    location_id: i64,
    person: &PersonProfile,
    documents: &DocumentPaths,
) -> Result<i64, PersistenceError> {
    let row: NewEmployeeRow<'_> = NewEmployeeRow {
        supervisor_id,
        location_id,
        status: EmployeeStatus::Pending.as_str(),
        first_name: &person.first_name,
        middle_name: person.middle_name.as_deref(),
        last_name: &person.last_name,
        dob: format_iso_date(person.dob),
        doj: format_iso_date(person.doj),
        phone: &person.phone,
        employee_code: &person.employee_code,
        designation: &person.designation,
        aadhaar_no: &person.aadhaar_no,
        pan_no: &person.pan_no,
        account_number: &person.account_number,
        ifsc: &person.ifsc,
        bank_name: &person.bank_name,
        profile_image: documents.profile_image.as_deref(),
        aadhaar_image: documents.aadhaar_image.as_deref(),
        pan_image: documents.pan_image.as_deref(),
        passbook_image: documents.passbook_image.as_deref(),
        current_address: &person.current_address,
        permanent_address: &person.permanent_address,
    };

    let employee_id: i64 = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(employees::table)
            .values(&row)
            .execute(conn)?;
        let employee_id: i64 = conn.get_last_insert_rowid()?;

        diesel::insert_into(notifications::table)
            .values((
                notifications::kind.eq(EMPLOYEE_PENDING),
                notifications::employee_id.eq(employee_id),
            ))
            .execute(conn)?;

        Ok(employee_id)
    })?;

    info!(employee_id, supervisor_id, location_id, "Employee created pending approval");
    Ok(employee_id)
}
}

backend_fn! {
/// Updates an employee's assignment and profile.
///
/// # Errors
///
/// Returns `NotFound` if the employee does not exist.
pub fn update_employee(
    conn: &mut _,
    employee_id: i64,
    supervisor_id: i64,
    location_id: i64,
    person: &PersonProfile,
    documents: &DocumentPaths,
) -> Result<(), PersistenceError> {
    let changes: EmployeeChanges<'_> = EmployeeChanges {
        supervisor_id,
        location_id,
        first_name: &person.first_name,
        middle_name: Some(person.middle_name.as_deref()),
        last_name: &person.last_name,
        dob: format_iso_date(person.dob),
        doj: format_iso_date(person.doj),
        phone: &person.phone,
        employee_code: &person.employee_code,
        designation: &person.designation,
        aadhaar_no: &person.aadhaar_no,
        pan_no: &person.pan_no,
        account_number: &person.account_number,
        ifsc: &person.ifsc,
        bank_name: &person.bank_name,
        profile_image: documents.profile_image.as_deref(),
        aadhaar_image: documents.aadhaar_image.as_deref(),
        pan_image: documents.pan_image.as_deref(),
        passbook_image: documents.passbook_image.as_deref(),
        current_address: &person.current_address,
        permanent_address: &person.permanent_address,
    };

    let rows_affected: usize = diesel::update(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .set(&changes)
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Employee with ID {employee_id} not found"
        )));
    }

    info!(employee_id, "Employee updated");
    Ok(())
}
}

backend_fn! {
/// Sets an employee's lifecycle status and marks the employee's
/// notifications read, atomically.
///
/// # Errors
///
/// Returns `NotFound` if the employee does not exist.
pub fn set_employee_status(
    conn: &mut _,
    employee_id: i64,
    status: EmployeeStatus,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(employees::table)
            .filter(employees::employee_id.eq(employee_id))
            .set(employees::status.eq(status.as_str()))
            .execute(conn)?;
        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Employee with ID {employee_id} not found"
            )));
        }

        diesel::update(notifications::table)
            .filter(notifications::employee_id.eq(employee_id))
            .filter(notifications::is_read.eq(0))
            .set(notifications::is_read.eq(1))
            .execute(conn)?;

        Ok(())
    })?;

    info!(employee_id, %status, "Employee status changed");
    Ok(())
}
}

backend_fn! {
/// Deletes an employee. Attendance and notifications cascade.
///
/// # Errors
///
/// Returns `NotFound` if the employee does not exist.
pub fn delete_employee(conn: &mut _, employee_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Employee with ID {employee_id} not found"
        )));
    }

    info!(employee_id, "Employee deleted");
    Ok(())
}
}
