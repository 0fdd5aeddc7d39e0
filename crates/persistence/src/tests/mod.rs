// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

#[cfg(feature = "mysql")]
mod backend_validation_tests;
mod employee_tests;
mod identity_tests;

use time::macros::date;

use crate::{DocumentPaths, Persistence, PersonProfile, SupervisorProfile};

pub const SUPERVISOR_PASSWORD: &str = "Supervisor#2026";

/// A fully populated profile with the given name.
pub fn create_test_person(first_name: &str, last_name: &str) -> PersonProfile {
    PersonProfile {
        first_name: first_name.to_string(),
        middle_name: None,
        last_name: last_name.to_string(),
        dob: date!(1990 - 05 - 17),
        doj: date!(2024 - 01 - 02),
        phone: String::from("9876543210"),
        employee_code: format!("EMP-{first_name}"),
        designation: String::from("Operator"),
        aadhaar_no: String::from("123412341234"),
        pan_no: String::from("ABCDE1234F"),
        account_number: String::from("001122334455"),
        ifsc: String::from("SBIN0001234"),
        bank_name: String::from("State Bank"),
        current_address: String::from("12 Mill Road"),
        permanent_address: String::from("12 Mill Road"),
    }
}

pub fn create_test_supervisor_profile(location_id: i64) -> SupervisorProfile {
    SupervisorProfile {
        location_id,
        esic_no: Some(String::from("ESIC-1")),
        uan_no: None,
        person: create_test_person("Meena", "Rao"),
    }
}

/// A fixture with one location and one supervisor assigned to it.
pub struct Fixture {
    pub persistence: Persistence,
    pub location_id: i64,
    pub supervisor_id: i64,
    pub supervisor_user_id: i64,
}

pub fn create_fixture() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    let location_id: i64 = persistence.create_location("Pune").unwrap();
    let supervisor_id: i64 = persistence
        .create_supervisor(
            "meena",
            SUPERVISOR_PASSWORD,
            &create_test_supervisor_profile(location_id),
            &DocumentPaths::default(),
        )
        .unwrap();
    let supervisor_user_id: i64 = persistence
        .get_supervisor(supervisor_id)
        .unwrap()
        .expect("supervisor exists")
        .user_id;

    Fixture {
        persistence,
        location_id,
        supervisor_id,
        supervisor_user_id,
    }
}

/// Adds an employee under the fixture's supervisor.
pub fn add_employee(fixture: &mut Fixture, first_name: &str, last_name: &str) -> i64 {
    fixture
        .persistence
        .create_employee(
            fixture.supervisor_id,
            fixture.location_id,
            &create_test_person(first_name, last_name),
            &DocumentPaths::default(),
        )
        .unwrap()
}
