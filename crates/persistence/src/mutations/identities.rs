// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity and session mutations.

use diesel::prelude::*;
use rollcall_domain::Role;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::mutations::hash_password;
use crate::queries::identities::normalize_login;

backend_fn! {
/// Creates a login identity.
///
/// The login name is stored trimmed and lowercased.
///
/// # Errors
///
/// Returns `UniqueViolation` if the login name is taken, or an error if
/// hashing or the insert fails.
pub fn create_user(
    conn: &mut _,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: Role,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);
    let password_hash: String = hash_password(password)?;

    diesel::insert_into(users::table)
        .values((
            users::login_name.eq(&normalized_login),
            users::display_name.eq(display_name),
            users::password_hash.eq(&password_hash),
            users::role.eq(role.as_str()),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, login_name = %normalized_login, %role, "User created");
    Ok(user_id)
}
}

backend_fn! {
/// Stamps the user's last successful login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    debug!(user_id, "Updating last_login_at");

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Creates a session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The owning identity
/// * `expires_at` - Expiry as ISO 8601 text
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Records activity on a session.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token. Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes every session belonging to a user.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_sessions_for_user(conn: &mut _, user_id: i64) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::user_id.eq(user_id))
        .execute(conn)?;

    info!(user_id, rows_affected, "Deleted sessions for user");
    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes sessions whose expiry is before `now`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The current time as ISO 8601 text, same format as `expires_at`
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!(rows_affected, "Deleted expired sessions");
    Ok(rows_affected)
}
}
