// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `identities`: users, passwords, sessions
//! - `directory`: locations and supervisor identity/profile pairs
//! - `employees`: employee registry, reviews, notifications on create
//! - `attendance`: applying a mark plan to the ledger
//! - `notifications`: read flags
//!
//! Multi-row writes run inside a single Diesel transaction so a failure
//! leaves nothing behind. Generated ids are read back through
//! `PersistenceBackend::get_last_insert_rowid`.

pub mod attendance;
pub mod directory;
pub mod employees;
pub mod identities;
pub mod notifications;

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::error::PersistenceError;

/// Current UTC time as ISO 8601 text, the format stored in timestamp
/// columns written by the application.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Hashes a password with bcrypt at the default cost.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}
