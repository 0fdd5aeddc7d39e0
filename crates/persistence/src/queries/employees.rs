// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee registry lookups.

use diesel::prelude::*;
use rollcall::RosterEntry;
use rollcall_domain::parse_iso_date;
use tracing::debug;

use crate::data_models::{DocumentPaths, EmployeeData, EmployeeListFilter, PersonProfile};
use crate::diesel_schema::employees;
use crate::error::PersistenceError;
use crate::queries::contains_pattern;

#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    supervisor_id: i64,
    location_id: i64,
    status: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    dob: String,
    doj: String,
    phone: String,
    employee_code: String,
    designation: String,
    aadhaar_no: String,
    pan_no: String,
    account_number: String,
    ifsc: String,
    bank_name: String,
    profile_image: Option<String>,
    aadhaar_image: Option<String>,
    pan_image: Option<String>,
    passbook_image: Option<String>,
    current_address: String,
    permanent_address: String,
    created_at: String,
}

impl TryFrom<EmployeeRow> for EmployeeData {
    type Error = PersistenceError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.employee_id,
            supervisor_id: row.supervisor_id,
            location_id: row.location_id,
            status: row.status.parse()?,
            person: PersonProfile {
                first_name: row.first_name,
                middle_name: row.middle_name,
                last_name: row.last_name,
                dob: parse_iso_date(&row.dob)?,
                doj: parse_iso_date(&row.doj)?,
                phone: row.phone,
                employee_code: row.employee_code,
                designation: row.designation,
                aadhaar_no: row.aadhaar_no,
                pan_no: row.pan_no,
                account_number: row.account_number,
                ifsc: row.ifsc,
                bank_name: row.bank_name,
                current_address: row.current_address,
                permanent_address: row.permanent_address,
            },
            documents: DocumentPaths {
                profile_image: row.profile_image,
                aadhaar_image: row.aadhaar_image,
                pan_image: row.pan_image,
                passbook_image: row.passbook_image,
            },
            created_at: row.created_at,
        })
    }
}

backend_fn! {
/// Retrieves an employee by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed. Returns `Ok(None)` if the employee is not found.
pub fn get_employee(
    conn: &mut _,
    employee_id: i64,
) -> Result<Option<EmployeeData>, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    let row: Option<EmployeeRow> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EmployeeData::try_from).transpose()
}
}

backend_fn! {
/// Lists employees matching every filter that is set, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed.
pub fn list_employees(
    conn: &mut _,
    filter: &EmployeeListFilter,
) -> Result<Vec<EmployeeData>, PersistenceError> {
    debug!(?filter, "Listing employees");

    let mut query = employees::table
        .select(EmployeeRow::as_select())
        .into_boxed();

    if let Some(supervisor_id) = filter.supervisor_id {
        query = query.filter(employees::supervisor_id.eq(supervisor_id));
    }
    if let Some(location_id) = filter.location_id {
        query = query.filter(employees::location_id.eq(location_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(employees::status.eq(status.as_str()));
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

    let rows: Vec<EmployeeRow> = query
        .order_by((
            employees::first_name.asc(),
            employees::last_name.asc(),
            employees::employee_id.asc(),
        ))
        .load(conn)?;

    rows.into_iter().map(EmployeeData::try_from).collect()
}
}

backend_fn! {
/// Lists every employee at a location as grid roster entries, ordered by
/// first name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_roster(conn: &mut _, location_id: i64) -> Result<Vec<RosterEntry>, PersistenceError> {
    debug!(location_id, "Loading attendance roster");

    let rows: Vec<(i64, String, String, String)> = employees::table
        .filter(employees::location_id.eq(location_id))
        .select((
            employees::employee_id,
            employees::first_name,
            employees::last_name,
            employees::employee_code,
        ))
        .order_by((
            employees::first_name.asc(),
            employees::last_name.asc(),
            employees::employee_id.asc(),
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(employee_id, first_name, last_name, employee_code)| RosterEntry {
                employee_id,
                display_name: format!("{first_name} {last_name}"),
                employee_code,
            },
        )
        .collect())
}
}
