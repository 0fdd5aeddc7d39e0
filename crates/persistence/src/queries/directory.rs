// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Location and supervisor lookups.

use std::collections::HashMap;

use diesel::prelude::*;
use rollcall_domain::parse_iso_date;
use tracing::debug;

use crate::data_models::{DocumentPaths, LocationData, PersonProfile, SupervisorData};
use crate::diesel_schema::{locations, supervisors, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = supervisors)]
struct SupervisorRow {
    supervisor_id: i64,
    user_id: i64,
    location_id: i64,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    dob: String,
    doj: String,
    phone: String,
    employee_code: String,
    esic_no: Option<String>,
    uan_no: Option<String>,
    aadhaar_no: String,
    pan_no: String,
    designation: String,
    account_number: String,
    ifsc: String,
    bank_name: String,
    profile_image: Option<String>,
    aadhaar_image: Option<String>,
    pan_image: Option<String>,
    passbook_image: Option<String>,
    current_address: String,
    permanent_address: String,
}

impl SupervisorRow {
    fn into_data(
        self,
        login_name: String,
        location_name: String,
    ) -> Result<SupervisorData, PersistenceError> {
        Ok(SupervisorData {
            supervisor_id: self.supervisor_id,
            user_id: self.user_id,
            login_name,
            location_id: self.location_id,
            location_name,
            esic_no: self.esic_no,
            uan_no: self.uan_no,
            person: PersonProfile {
                first_name: self.first_name,
                middle_name: self.middle_name,
                last_name: self.last_name,
                dob: parse_iso_date(&self.dob)?,
                doj: parse_iso_date(&self.doj)?,
                phone: self.phone,
                employee_code: self.employee_code,
                designation: self.designation,
                aadhaar_no: self.aadhaar_no,
                pan_no: self.pan_no,
                account_number: self.account_number,
                ifsc: self.ifsc,
                bank_name: self.bank_name,
                current_address: self.current_address,
                permanent_address: self.permanent_address,
            },
            documents: DocumentPaths {
                profile_image: self.profile_image,
                aadhaar_image: self.aadhaar_image,
                pan_image: self.pan_image,
                passbook_image: self.passbook_image,
            },
        })
    }
}

backend_fn! {
/// Lists all locations ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(conn: &mut _) -> Result<Vec<LocationData>, PersistenceError> {
    debug!("Listing locations");

    let rows: Vec<(i64, String)> = locations::table
        .select((locations::location_id, locations::name))
        .order_by(locations::name.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(location_id, name)| LocationData { location_id, name })
        .collect())
}
}

backend_fn! {
/// Retrieves a location by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the location is not found.
pub fn get_location(
    conn: &mut _,
    location_id: i64,
) -> Result<Option<LocationData>, PersistenceError> {
    let name: Option<String> = locations::table
        .filter(locations::location_id.eq(location_id))
        .select(locations::name)
        .first(conn)
        .optional()?;

    Ok(name.map(|name| LocationData { location_id, name }))
}
}

backend_fn! {
/// Lists all supervisors ordered by first then last name.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed.
pub fn list_supervisors(conn: &mut _) -> Result<Vec<SupervisorData>, PersistenceError> {
    debug!("Listing supervisors");

    let location_names: HashMap<i64, String> = locations::table
        .select((locations::location_id, locations::name))
        .load::<(i64, String)>(conn)?
        .into_iter()
        .collect();

    let rows: Vec<(SupervisorRow, String)> = supervisors::table
        .inner_join(users::table)
        .select((SupervisorRow::as_select(), users::login_name))
        .order_by((supervisors::first_name.asc(), supervisors::last_name.asc()))
        .load(conn)?;

    rows.into_iter()
        .map(|(row, login_name)| {
            let location_name: String = location_names
                .get(&row.location_id)
                .cloned()
                .unwrap_or_default();
            row.into_data(login_name, location_name)
        })
        .collect()
}
}

backend_fn! {
/// Retrieves a supervisor by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed. Returns `Ok(None)` if the supervisor is not found.
pub fn get_supervisor(
    conn: &mut _,
    supervisor_id: i64,
) -> Result<Option<SupervisorData>, PersistenceError> {
    debug!(supervisor_id, "Looking up supervisor");

    let found: Option<(SupervisorRow, String)> = supervisors::table
        .inner_join(users::table)
        .filter(supervisors::supervisor_id.eq(supervisor_id))
        .select((SupervisorRow::as_select(), users::login_name))
        .first(conn)
        .optional()?;

    let Some((row, login_name)) = found else {
        return Ok(None);
    };

    let location_name: String = locations::table
        .filter(locations::location_id.eq(row.location_id))
        .select(locations::name)
        .first(conn)?;

    Ok(Some(row.into_data(login_name, location_name)?))
}
}

backend_fn! {
/// Retrieves the supervisor profile attached to an identity.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is
/// malformed. Returns `Ok(None)` if the identity has no profile.
pub fn get_supervisor_by_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Option<SupervisorData>, PersistenceError> {
    debug!(user_id, "Looking up supervisor profile for user");

    let found: Option<(SupervisorRow, String)> = supervisors::table
        .inner_join(users::table)
        .filter(supervisors::user_id.eq(user_id))
        .select((SupervisorRow::as_select(), users::login_name))
        .first(conn)
        .optional()?;

    let Some((row, login_name)) = found else {
        return Ok(None);
    };

    let location_name: String = locations::table
        .filter(locations::location_id.eq(row.location_id))
        .select(locations::name)
        .first(conn)?;

    Ok(Some(row.into_data(login_name, location_name)?))
}
}
