// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific connection setup.
//!
//! Everything that cannot be written once in Diesel DSL lives here:
//! establishing connections, running the embedded migrations for each
//! backend, PRAGMA/system-variable checks, and reading the id of the row
//! just inserted. Queries and mutations stay in `queries/` and
//! `mutations/` and are shared by every backend.
//!
//! - `sqlite` is always compiled and is what tests run against.
//! - `mysql` is compiled with the `mysql` feature and validated by the
//!   ignored backend tests (`cargo xtask test-mariadb`).

#[cfg(feature = "mysql")]
pub mod mysql;
pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

/// Operations every backend connection must provide beyond Diesel DSL.
pub trait PersistenceBackend: Connection {
    /// Retrieves the id generated by the most recent insert on this
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// Cascades on employee and identity deletion depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

#[cfg(feature = "mysql")]
impl PersistenceBackend for diesel::MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}
