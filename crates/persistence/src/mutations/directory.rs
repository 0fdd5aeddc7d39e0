// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Location and supervisor mutations.
//!
//! A supervisor is an identity plus a profile row; both are written or
//! removed together in one transaction.

use diesel::dsl::count;
use diesel::prelude::*;
use rollcall_domain::{Role, format_iso_date};
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{DocumentPaths, SupervisorProfile};
use crate::diesel_schema::{employees, locations, sessions, supervisors, users};
use crate::error::PersistenceError;
use crate::mutations::hash_password;
use crate::queries::identities::normalize_login;

#[derive(Insertable)]
#[diesel(table_name = supervisors)]
struct NewSupervisorRow<'a> {
    user_id: i64,
    location_id: i64,
    first_name: &'a str,
    middle_name: Option<&'a str>,
    last_name: &'a str,
    dob: String,
    doj: String,
    phone: &'a str,
    employee_code: &'a str,
    esic_no: Option<&'a str>,
    uan_no: Option<&'a str>,
    aadhaar_no: &'a str,
    pan_no: &'a str,
    designation: &'a str,
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

impl<'a> NewSupervisorRow<'a> {
    fn new(user_id: i64, profile: &'a SupervisorProfile, documents: &'a DocumentPaths) -> Self {
        let person = &profile.person;
        Self {
            user_id,
            location_id: profile.location_id,
            first_name: &person.first_name,
            middle_name: person.middle_name.as_deref(),
            last_name: &person.last_name,
            dob: format_iso_date(person.dob),
            doj: format_iso_date(person.doj),
            phone: &person.phone,
            employee_code: &person.employee_code,
            esic_no: profile.esic_no.as_deref(),
            uan_no: profile.uan_no.as_deref(),
            aadhaar_no: &person.aadhaar_no,
            pan_no: &person.pan_no,
            designation: &person.designation,
            account_number: &person.account_number,
            ifsc: &person.ifsc,
            bank_name: &person.bank_name,
            profile_image: documents.profile_image.as_deref(),
            aadhaar_image: documents.aadhaar_image.as_deref(),
            pan_image: documents.pan_image.as_deref(),
            passbook_image: documents.passbook_image.as_deref(),
            current_address: &person.current_address,
            permanent_address: &person.permanent_address,
        }
    }
}

/// Profile update. `None` document slots keep the stored path; the
/// nullable profile columns are always written.
#[derive(AsChangeset)]
#[diesel(table_name = supervisors)]
struct SupervisorChanges<'a> {
    location_id: i64,
    first_name: &'a str,
    middle_name: Option<Option<&'a str>>,
    last_name: &'a str,
    dob: String,
    doj: String,
    phone: &'a str,
    employee_code: &'a str,
    esic_no: Option<Option<&'a str>>,
    uan_no: Option<Option<&'a str>>,
    aadhaar_no: &'a str,
    pan_no: &'a str,
    designation: &'a str,
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

impl<'a> SupervisorChanges<'a> {
    fn new(profile: &'a SupervisorProfile, documents: &'a DocumentPaths) -> Self {
        let person = &profile.person;
        Self {
            location_id: profile.location_id,
            first_name: &person.first_name,
            middle_name: Some(person.middle_name.as_deref()),
            last_name: &person.last_name,
            dob: format_iso_date(person.dob),
            doj: format_iso_date(person.doj),
            phone: &person.phone,
            employee_code: &person.employee_code,
            esic_no: Some(profile.esic_no.as_deref()),
            uan_no: Some(profile.uan_no.as_deref()),
            aadhaar_no: &person.aadhaar_no,
            pan_no: &person.pan_no,
            designation: &person.designation,
            account_number: &person.account_number,
            ifsc: &person.ifsc,
            bank_name: &person.bank_name,
            profile_image: documents.profile_image.as_deref(),
            aadhaar_image: documents.aadhaar_image.as_deref(),
            pan_image: documents.pan_image.as_deref(),
            passbook_image: documents.passbook_image.as_deref(),
            current_address: &person.current_address,
            permanent_address: &person.permanent_address,
        }
    }
}

backend_fn! {
/// Creates a location. `name` must already be normalized.
///
/// # Errors
///
/// Returns `UniqueViolation` if the name exists, or an error if the
/// insert fails.
pub fn create_location(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(locations::table)
        .values(locations::name.eq(name))
        .execute(conn)?;

    let location_id: i64 = conn.get_last_insert_rowid()?;

    info!(location_id, name, "Location created");
    Ok(location_id)
}
}

backend_fn! {
/// Creates a supervisor identity and its profile atomically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `login_name` - Login for the new identity (normalized on write)
/// * `password` - Plain-text password (hashed on write)
/// * `profile` - Profile fields, including the assigned location
/// * `documents` - Stored document paths
///
/// # Returns
///
/// The new supervisor id.
///
/// # Errors
///
/// Returns `UniqueViolation` if the login name is taken. Nothing is
/// written on any error.
pub fn create_supervisor(
    conn: &mut _,
    login_name: &str,
    password: &str,
    profile: &SupervisorProfile,
    documents: &DocumentPaths,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);
    let password_hash: String = hash_password(password)?;
    let display_name: String = profile.person.full_name();

    let supervisor_id: i64 = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(users::table)
            .values((
                users::login_name.eq(&normalized_login),
                users::display_name.eq(&display_name),
                users::password_hash.eq(&password_hash),
                users::role.eq(Role::Supervisor.as_str()),
            ))
            .execute(conn)?;
        let user_id: i64 = conn.get_last_insert_rowid()?;

        diesel::insert_into(supervisors::table)
            .values(&NewSupervisorRow::new(user_id, profile, documents))
            .execute(conn)?;
        conn.get_last_insert_rowid()
    })?;

    info!(supervisor_id, login_name = %normalized_login, "Supervisor created");
    Ok(supervisor_id)
}
}

backend_fn! {
/// Updates a supervisor's identity and profile atomically.
///
/// When `new_password` is set the hash is replaced and every session of
/// the supervisor is revoked.
///
/// # Returns
///
/// The number of sessions revoked.
///
/// # Errors
///
/// Returns `NotFound` if the supervisor does not exist, `UniqueViolation`
/// if the login name is taken by another identity.
pub fn update_supervisor(
    conn: &mut _,
    supervisor_id: i64,
    login_name: &str,
    profile: &SupervisorProfile,
    documents: &DocumentPaths,
    new_password: Option<&str>,
) -> Result<usize, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);
    let display_name: String = profile.person.full_name();
    let password_hash: Option<String> = new_password.map(hash_password).transpose()?;

    let revoked: usize = conn.transaction::<_, PersistenceError, _>(|conn| {
        let user_id: i64 = supervisors::table
            .filter(supervisors::supervisor_id.eq(supervisor_id))
            .select(supervisors::user_id)
            .first(conn)?;

        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set((
                users::login_name.eq(&normalized_login),
                users::display_name.eq(&display_name),
            ))
            .execute(conn)?;

        let mut revoked: usize = 0;
        if let Some(hash) = &password_hash {
            diesel::update(users::table)
                .filter(users::user_id.eq(user_id))
                .set(users::password_hash.eq(hash))
                .execute(conn)?;
            revoked = diesel::delete(sessions::table)
                .filter(sessions::user_id.eq(user_id))
                .execute(conn)?;
        }

        diesel::update(supervisors::table)
            .filter(supervisors::supervisor_id.eq(supervisor_id))
            .set(&SupervisorChanges::new(profile, documents))
            .execute(conn)?;

        Ok(revoked)
    })?;

    info!(
        supervisor_id,
        password_changed = password_hash.is_some(),
        revoked,
        "Supervisor updated"
    );
    Ok(revoked)
}
}

backend_fn! {
/// Deletes a supervisor, its identity, and the identity's sessions
/// atomically.
///
/// # Errors
///
/// Returns `NotFound` if the supervisor does not exist, or
/// `SupervisorHasEmployees` if employees are still assigned.
pub fn delete_supervisor(conn: &mut _, supervisor_id: i64) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let user_id: i64 = supervisors::table
            .filter(supervisors::supervisor_id.eq(supervisor_id))
            .select(supervisors::user_id)
            .first(conn)?;

        let employee_count: i64 = employees::table
            .filter(employees::supervisor_id.eq(supervisor_id))
            .select(count(employees::employee_id))
            .first(conn)?;
        if employee_count > 0 {
            warn!(supervisor_id, employee_count, "Refusing to delete supervisor with employees");
            return Err(PersistenceError::SupervisorHasEmployees {
                supervisor_id,
                employee_count,
            });
        }

        diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;
        diesel::delete(supervisors::table)
            .filter(supervisors::supervisor_id.eq(supervisor_id))
            .execute(conn)?;
        diesel::delete(users::table)
            .filter(users::user_id.eq(user_id))
            .execute(conn)?;

        info!(supervisor_id, user_id, "Supervisor deleted");
        Ok(())
    })
}
}
