// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::{DocumentKind, FieldErrors};
use time::macros::date;

use super::helpers::{employee_form, image, supervisor_form};
use crate::{
    EmployeeAssignment, EmployeeInput, IMAGES_ONLY, LocationInput, SubmittedForm,
    SupervisorInput, UploadedFile, collect_documents,
};

#[test]
fn test_location_name_is_trimmed() {
    let form: SubmittedForm = SubmittedForm::from_fields([("name", "  Pune East ")]);
    assert_eq!(LocationInput::parse(&form).unwrap().name, "Pune East");
}

#[test]
fn test_location_name_length_is_enforced() {
    let short: SubmittedForm = SubmittedForm::from_fields([("name", " P ")]);
    let missing: SubmittedForm = SubmittedForm::new();

    assert!(LocationInput::parse(&short).unwrap_err().contains("name"));
    assert_eq!(
        LocationInput::parse(&missing).unwrap_err().get("name"),
        Some(&[String::from("This field is required.")][..])
    );
}

#[test]
fn test_employee_form_parses_profile_and_uppercases_ids() {
    let mut form: SubmittedForm = employee_form("Asha", "Patil");
    form.insert_field("middle_name", "   ");

    let input: EmployeeInput = EmployeeInput::parse(&mut form, false).unwrap();

    assert_eq!(input.person.first_name, "Asha");
    assert_eq!(input.person.middle_name, None);
    assert_eq!(input.person.dob, date!(1991 - 02 - 03));
    assert_eq!(input.person.pan_no, "PQRST6789K");
    assert_eq!(input.person.ifsc, "HDFC0004321");
    assert_eq!(input.assignment, None);
}

#[test]
fn test_employee_form_reports_every_failing_field() {
    let mut form: SubmittedForm = employee_form("Asha", "Patil");
    form.insert_field("first_name", "");
    form.insert_field("phone", "12345");
    form.insert_field("aadhaar_no", "1234");
    form.insert_field("dob", "17/05/1990");

    let errors: FieldErrors = EmployeeInput::parse(&mut form, false).unwrap_err();

    assert!(errors.contains("first_name"));
    assert_eq!(
        errors.get("phone"),
        Some(&[String::from("Enter 10 digit phone number")][..])
    );
    assert!(errors.contains("aadhaar_no"));
    assert!(errors.contains("dob"));
    assert!(!errors.contains("last_name"));
}

#[test]
fn test_admin_employee_form_requires_assignment() {
    let mut without: SubmittedForm = employee_form("Asha", "Patil");
    let errors: FieldErrors = EmployeeInput::parse(&mut without, true).unwrap_err();
    assert!(errors.contains("supervisor_id"));
    assert!(errors.contains("location_id"));

    let mut with: SubmittedForm = employee_form("Asha", "Patil");
    with.insert_field("supervisor_id", "4");
    with.insert_field("location_id", "9");
    let input: EmployeeInput = EmployeeInput::parse(&mut with, true).unwrap();
    assert_eq!(
        input.assignment,
        Some(EmployeeAssignment {
            supervisor_id: 4,
            location_id: 9,
        })
    );
}

#[test]
fn test_supervisor_password_required_only_on_create() {
    let mut create: SubmittedForm = supervisor_form("kiran", 1, "");
    let errors: FieldErrors = SupervisorInput::parse(&mut create, true).unwrap_err();
    assert!(errors.contains("password"));

    let mut edit: SubmittedForm = supervisor_form("kiran", 1, "");
    let input: SupervisorInput = SupervisorInput::parse(&mut edit, false).unwrap();
    assert_eq!(input.password, None);
    assert_eq!(input.login_name, "kiran");
    assert_eq!(input.profile.location_id, 1);
}

#[test]
fn test_supervisor_form_requires_username_and_location() {
    let mut form: SubmittedForm = supervisor_form("", 1, "Str0ngPass");
    form.insert_field("location_id", "north");

    let errors: FieldErrors = SupervisorInput::parse(&mut form, true).unwrap_err();

    assert!(errors.contains("username"));
    assert_eq!(
        errors.get("location_id"),
        Some(&[String::from("Not a valid choice.")][..])
    );
}

#[test]
fn test_documents_accept_images_and_skip_empty_inputs() {
    let mut form: SubmittedForm = SubmittedForm::new();
    form.insert_file("profile_image", image("face.PNG"));
    form.insert_file(
        "pan_image",
        UploadedFile {
            file_name: String::new(),
            bytes: Vec::new(),
        },
    );

    let documents = collect_documents(&form).unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].0, DocumentKind::Profile);
    assert_eq!(documents[0].1.file_name, "face.PNG");
}

#[test]
fn test_documents_reject_non_images() {
    let mut form: SubmittedForm = SubmittedForm::new();
    form.insert_file("aadhaar_image", image("aadhaar.pdf"));
    form.insert_file("passbook_image", image("passbook.jpeg"));

    let errors: FieldErrors = collect_documents(&form).unwrap_err();

    assert_eq!(
        errors.get("aadhaar_image"),
        Some(&[String::from(IMAGES_ONLY)][..])
    );
    assert!(!errors.contains("passbook_image"));
}
