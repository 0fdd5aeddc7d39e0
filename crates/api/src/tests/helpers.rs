// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rollcall::{MarkDecision, MarkPlan};
use rollcall_domain::{AttendanceStatus, Role};
use rollcall_persistence::{DocumentPaths, Persistence, PersonProfile, SupervisorProfile};
use tempfile::TempDir;
use time::Date;
use time::macros::date;

use crate::{AuthenticatedActor, DocumentStore, SubmittedForm, UploadedFile};

pub const ADMIN_PASSWORD: &str = "Admin#2026";
pub const SUPERVISOR_PASSWORD: &str = "Supervisor#2026";

/// A Wednesday; its week runs 2026-10-12 through 2026-10-18.
pub const TODAY: Date = date!(2026 - 10 - 14);

/// An admin, a location, and a supervisor assigned to it, with documents
/// stored under a temporary directory.
pub struct TestContext {
    pub persistence: Persistence,
    pub store: DocumentStore,
    pub upload_dir: TempDir,
    pub admin: AuthenticatedActor,
    pub supervisor: AuthenticatedActor,
    pub location_id: i64,
    pub supervisor_id: i64,
}

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

pub fn actor_for(persistence: &mut Persistence, user_id: i64) -> AuthenticatedActor {
    let user = persistence
        .get_user_by_id(user_id)
        .unwrap()
        .expect("user exists");
    AuthenticatedActor::from_user(&user)
}

/// Creates a supervisor at `location_id` and returns its id and actor.
pub fn create_supervisor_at(
    persistence: &mut Persistence,
    login_name: &str,
    location_id: i64,
) -> (i64, AuthenticatedActor) {
    let profile: SupervisorProfile = SupervisorProfile {
        location_id,
        esic_no: None,
        uan_no: None,
        person: create_test_person("Meena", "Rao"),
    };
    let supervisor_id: i64 = persistence
        .create_supervisor(
            login_name,
            SUPERVISOR_PASSWORD,
            &profile,
            &DocumentPaths::default(),
        )
        .unwrap();
    let user_id: i64 = persistence
        .get_supervisor(supervisor_id)
        .unwrap()
        .expect("supervisor exists")
        .user_id;
    (supervisor_id, actor_for(persistence, user_id))
}

pub fn setup_test_context() -> TestContext {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    let admin_id: i64 = persistence
        .create_user("admin", "Administrator", ADMIN_PASSWORD, Role::Admin)
        .unwrap();
    let admin: AuthenticatedActor = actor_for(&mut persistence, admin_id);

    let location_id: i64 = persistence.create_location("Pune").unwrap();
    let (supervisor_id, supervisor) = create_supervisor_at(&mut persistence, "meena", location_id);

    let upload_dir: TempDir = TempDir::new().expect("temporary upload directory");
    let store: DocumentStore = DocumentStore::new(upload_dir.path());

    TestContext {
        persistence,
        store,
        upload_dir,
        admin,
        supervisor,
        location_id,
        supervisor_id,
    }
}

/// Adds a pending employee under the context's supervisor.
pub fn add_test_employee(ctx: &mut TestContext, first_name: &str, last_name: &str) -> i64 {
    ctx.persistence
        .create_employee(
            ctx.supervisor_id,
            ctx.location_id,
            &create_test_person(first_name, last_name),
            &DocumentPaths::default(),
        )
        .unwrap()
}

/// A valid employee form. PAN and IFSC are lowercase to exercise
/// normalization.
pub fn employee_form(first_name: &str, last_name: &str) -> SubmittedForm {
    SubmittedForm::from_fields([
        ("first_name", first_name),
        ("last_name", last_name),
        ("dob", "1991-02-03"),
        ("doj", "2025-06-01"),
        ("phone", "9123456780"),
        ("employee_code", "EMP-100"),
        ("designation", "Packer"),
        ("aadhaar_no", "567856785678"),
        ("pan_no", "pqrst6789k"),
        ("account_number", "998877665544"),
        ("ifsc", "hdfc0004321"),
        ("bank_name", "HDFC"),
        ("current_address", "4 Station Road"),
        ("permanent_address", "4 Station Road"),
    ])
}

/// A valid supervisor form.
pub fn supervisor_form(login_name: &str, location_id: i64, password: &str) -> SubmittedForm {
    let mut form: SubmittedForm = employee_form("Kiran", "Das");
    form.insert_field("username", login_name);
    form.insert_field("location_id", location_id.to_string());
    form.insert_field("password", password);
    form
}

pub fn image(file_name: &str) -> UploadedFile {
    UploadedFile {
        file_name: file_name.to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A],
    }
}

/// Writes one attendance record directly, bypassing the grid form.
pub fn record_attendance(
    ctx: &mut TestContext,
    employee_id: i64,
    date: Date,
    status: AttendanceStatus,
    overtime_hours: f64,
) {
    let plan: MarkPlan = MarkPlan {
        date,
        marked_by: ctx.supervisor.user_id,
        decisions: vec![MarkDecision::Record {
            employee_id,
            status,
            overtime_hours,
        }],
    };
    ctx.persistence.mark_attendance(&plan).unwrap();
}
