// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! These check schema compatibility, not business rules: migrations
//! apply, constraints fire, and transactions roll back. Business logic
//! is covered by the `SQLite` suite.
//!
//! All tests here are `#[ignore]` and run only via
//! `cargo xtask test-mariadb`, which provisions the database and sets:
//! - `DATABASE_URL`
//! - `ROLLCALL_TEST_BACKEND=mariadb`
//!
//! Tests fail fast if that infrastructure is missing.

use diesel::MysqlConnection;
use diesel::prelude::*;
use std::env;

use crate::Persistence;
use crate::backend::mysql;

fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

fn verify_mariadb_test_environment() {
    let backend = env::var("ROLLCALL_TEST_BACKEND").expect(
        "ROLLCALL_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "ROLLCALL_TEST_BACKEND must be 'mariadb'");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = MysqlConnection::establish(&url);
    assert!(result.is_ok(), "Failed to connect to MariaDB: {:?}", result.err());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");
    assert!(mysql::verify_foreign_key_enforcement(&mut conn).is_ok());

    let result = diesel::sql_query(
        "INSERT INTO attendance (employee_id, date, status, overtime_hours, marked_at)
         VALUES (999999, '2026-10-14', 'Present', 0, '2026-10-14T00:00:00Z')",
    )
    .execute(&mut conn);
    assert!(
        result.is_err(),
        "Attendance for a missing employee should fail the foreign key"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_user_login_unique_constraint() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(
        "INSERT INTO users (login_name, display_name, password_hash, role)
         VALUES ('validation_user', 'Validation', 'hash', 'admin')",
    )
    .execute(&mut conn)
    .expect("Failed to insert test user");

    let duplicate = diesel::sql_query(
        "INSERT INTO users (login_name, display_name, password_hash, role)
         VALUES ('validation_user', 'Again', 'hash2', 'supervisor')",
    )
    .execute(&mut conn);
    assert!(duplicate.is_err(), "Duplicate login_name should fail");

    diesel::sql_query("DELETE FROM users WHERE login_name = 'validation_user'")
        .execute(&mut conn)
        .expect("Failed to clean up test user");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_transaction_rollback() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result: Result<(), diesel::result::Error> = conn.transaction(|conn| {
        diesel::sql_query("INSERT INTO locations (name) VALUES ('Rollback Town')").execute(conn)?;
        Err(diesel::result::Error::RollbackTransaction)
    });
    assert!(result.is_err());

    let remaining: i64 = crate::diesel_schema::locations::table
        .filter(crate::diesel_schema::locations::name.eq("Rollback Town"))
        .count()
        .get_result(&mut conn)
        .expect("Failed to count locations");
    assert_eq!(remaining, 0);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_persistence_round_trip() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut persistence = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB");
    let location_id = persistence
        .create_location("Validation Depot")
        .expect("Failed to create location");

    let location = persistence
        .get_location(location_id)
        .expect("Failed to read location");
    assert_eq!(location.map(|l| l.name).as_deref(), Some("Validation Depot"));
}
