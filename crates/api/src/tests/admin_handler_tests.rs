// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the admin pages and actions.

use rollcall_domain::EmployeeStatus;
use rollcall_persistence::EmployeeData;

use super::helpers::{
    SUPERVISOR_PASSWORD, TestContext, add_test_employee, employee_form, image, setup_test_context,
    supervisor_form,
};
use crate::{
    ActionOutcome, ApiError, AuthenticationService, EmployeeQuery, EmployeesView, FlashKind,
    LoginRequest, SubmittedForm, admin_dashboard, approval_queue, create_location,
    create_supervisor, delete_employee, delete_supervisor, employee_detail, list_employees,
    list_locations, list_supervisors, login, mark_notification_read, notifications,
    review_employee, supervisor_form as supervisor_form_page, update_employee_admin,
    update_supervisor,
};

fn assert_flash(outcome: &ActionOutcome, kind: FlashKind, message: &str) {
    let flash = outcome.flash.as_ref().expect("outcome carries a flash");
    assert_eq!(flash.kind, kind);
    assert_eq!(flash.message, message);
}

fn employee_status(ctx: &mut TestContext, employee_id: i64) -> EmployeeStatus {
    ctx.persistence
        .get_employee(employee_id)
        .unwrap()
        .unwrap()
        .status
}

// ============================================================================
// Access
// ============================================================================

#[test]
fn test_supervisor_is_refused_admin_pages() {
    let mut ctx: TestContext = setup_test_context();
    let supervisor = ctx.supervisor.clone();

    assert!(matches!(
        list_locations(&mut ctx.persistence, &supervisor),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        admin_dashboard(&mut ctx.persistence, &supervisor),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        delete_supervisor(&mut ctx.persistence, &ctx.store, &supervisor, ctx.supervisor_id),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(ctx.persistence.get_supervisor(ctx.supervisor_id).unwrap().is_some());
}

#[test]
fn test_dashboard_counts() {
    let mut ctx: TestContext = setup_test_context();
    add_test_employee(&mut ctx, "Asha", "Patil");
    let admin = ctx.admin.clone();

    let view = admin_dashboard(&mut ctx.persistence, &admin).unwrap();

    assert_eq!(view.display_name, "Administrator");
    assert_eq!(view.counts.locations, 1);
    assert_eq!(view.counts.supervisors, 1);
    assert_eq!(view.counts.employees, 1);
    assert_eq!(view.counts.pending_employees, 1);
    assert_eq!(view.counts.unread_notifications, 1);
}

// ============================================================================
// Locations
// ============================================================================

#[test]
fn test_create_location() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let form: SubmittedForm = SubmittedForm::from_fields([("name", "  Nashik ")]);

    let outcome: ActionOutcome = create_location(&mut ctx.persistence, &admin, &form).unwrap();

    assert_flash(&outcome, FlashKind::Success, "Location added successfully.");
    assert_eq!(outcome.redirect, "/admin/locations");
    let names: Vec<String> = list_locations(&mut ctx.persistence, &admin)
        .unwrap()
        .locations
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert!(names.contains(&String::from("Nashik")));
}

#[test]
fn test_duplicate_location_is_a_warning() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let form: SubmittedForm = SubmittedForm::from_fields([("name", "Pune")]);

    let outcome: ActionOutcome = create_location(&mut ctx.persistence, &admin, &form).unwrap();

    assert_flash(&outcome, FlashKind::Warning, "Location already exists.");
    assert_eq!(
        list_locations(&mut ctx.persistence, &admin)
            .unwrap()
            .locations
            .len(),
        1
    );
}

#[test]
fn test_location_name_too_short_is_rejected() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let form: SubmittedForm = SubmittedForm::from_fields([("name", "X")]);

    let result = create_location(&mut ctx.persistence, &admin, &form);

    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { ref errors }) if errors.contains("name")
    ));
}

// ============================================================================
// Supervisors
// ============================================================================

#[test]
fn test_create_supervisor_enables_login() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let mut form: SubmittedForm = supervisor_form("Kiran", ctx.location_id, "Kiran#2026");
    form.insert_file("profile_image", image("kiran.png"));

    let outcome: ActionOutcome =
        create_supervisor(&mut ctx.persistence, &ctx.store, &admin, &mut form).unwrap();

    assert_flash(
        &outcome,
        FlashKind::Success,
        "Supervisor registered successfully!",
    );
    assert_eq!(outcome.redirect, "/admin/add_supervisor");

    let supervisors = list_supervisors(&mut ctx.persistence, &admin)
        .unwrap()
        .supervisors;
    let kiran = supervisors
        .iter()
        .find(|s| s.login_name == "kiran")
        .expect("supervisor listed");
    assert_eq!(kiran.location_name, "Pune");
    assert_eq!(kiran.person.pan_no, "PQRST6789K");
    let profile_image: &str = kiran.documents.profile_image.as_deref().unwrap();
    assert!(profile_image.starts_with("supervisors/"));
    assert!(ctx.upload_dir.path().join(profile_image).exists());

    let response = login(
        &mut ctx.persistence,
        &LoginRequest {
            username: String::from("kiran"),
            password: String::from("Kiran#2026"),
            next: None,
        },
    )
    .unwrap();
    assert_eq!(response.redirect, "/supervisor/dashboard");
}

#[test]
fn test_create_supervisor_enforces_password_policy() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let mut form: SubmittedForm = supervisor_form("kiran", ctx.location_id, "short");

    let result = create_supervisor(&mut ctx.persistence, &ctx.store, &admin, &mut form);

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
    assert!(ctx.persistence.get_user_by_login("kiran").unwrap().is_none());
}

#[test]
fn test_create_supervisor_rejects_duplicate_username() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let mut form: SubmittedForm = supervisor_form("MEENA", ctx.location_id, "Another#2026");

    let result = create_supervisor(&mut ctx.persistence, &ctx.store, &admin, &mut form);

    match result {
        Err(ApiError::ValidationFailed { errors }) => {
            assert_eq!(
                errors.get("username"),
                Some(&[String::from("Username already exists.")][..])
            );
        }
        other => panic!("expected a username error, got {other:?}"),
    }
}

#[test]
fn test_create_supervisor_rejects_unknown_location() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let mut form: SubmittedForm = supervisor_form("kiran", 999, "Kiran#2026");

    let result = create_supervisor(&mut ctx.persistence, &ctx.store, &admin, &mut form);

    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { ref errors }) if errors.contains("location_id")
    ));
}

#[test]
fn test_supervisor_form_lists_locations() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();

    let blank = supervisor_form_page(&mut ctx.persistence, &admin, None).unwrap();
    assert!(blank.supervisor.is_none());
    assert_eq!(blank.locations.len(), 1);

    let editing =
        supervisor_form_page(&mut ctx.persistence, &admin, Some(ctx.supervisor_id)).unwrap();
    assert_eq!(editing.supervisor.unwrap().login_name, "meena");

    assert!(matches!(
        supervisor_form_page(&mut ctx.persistence, &admin, Some(999)),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_update_supervisor_password_revokes_sessions() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let session = login(
        &mut ctx.persistence,
        &LoginRequest {
            username: String::from("meena"),
            password: String::from(SUPERVISOR_PASSWORD),
            next: None,
        },
    )
    .unwrap();
    let mut form: SubmittedForm = supervisor_form("meena", ctx.location_id, "Fresh#Pass1");

    let outcome: ActionOutcome = update_supervisor(
        &mut ctx.persistence,
        &ctx.store,
        &admin,
        ctx.supervisor_id,
        &mut form,
    )
    .unwrap();

    assert_flash(&outcome, FlashKind::Success, "Supervisor updated successfully!");
    assert_eq!(outcome.redirect, "/admin/supervisors");
    assert!(
        AuthenticationService::validate_session(&mut ctx.persistence, &session.session_token)
            .is_err()
    );
    assert!(AuthenticationService::login(&mut ctx.persistence, "meena", "Fresh#Pass1").is_ok());
}

#[test]
fn test_update_supervisor_without_password_keeps_sessions() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let (token, _) =
        AuthenticationService::login(&mut ctx.persistence, "meena", SUPERVISOR_PASSWORD).unwrap();
    let mut form: SubmittedForm = supervisor_form("meena", ctx.location_id, "");
    form.insert_field("designation", "Shift Lead");

    update_supervisor(
        &mut ctx.persistence,
        &ctx.store,
        &admin,
        ctx.supervisor_id,
        &mut form,
    )
    .unwrap();

    assert!(AuthenticationService::validate_session(&mut ctx.persistence, &token).is_ok());
    let supervisor = ctx
        .persistence
        .get_supervisor(ctx.supervisor_id)
        .unwrap()
        .unwrap();
    assert_eq!(supervisor.person.designation, "Shift Lead");
}

#[test]
fn test_update_supervisor_replaces_document_in_place() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let id: i64 = ctx.supervisor_id;

    for _ in 0..2 {
        let mut form: SubmittedForm = supervisor_form("meena", ctx.location_id, "");
        form.insert_file("pan_image", image("pan card.jpg"));
        update_supervisor(&mut ctx.persistence, &ctx.store, &admin, id, &mut form).unwrap();
    }

    let supervisor = ctx.persistence.get_supervisor(id).unwrap().unwrap();
    let expected: String = format!("documents/pan_{id}.jpg");
    assert_eq!(supervisor.documents.pan_image.as_deref(), Some(expected.as_str()));
    assert!(ctx.upload_dir.path().join(&expected).exists());
}

#[test]
fn test_update_supervisor_with_new_extension_removes_old_file() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let id: i64 = ctx.supervisor_id;

    for file_name in ["pan.jpg", "pan.png"] {
        let mut form: SubmittedForm = supervisor_form("meena", ctx.location_id, "");
        form.insert_file("pan_image", image(file_name));
        update_supervisor(&mut ctx.persistence, &ctx.store, &admin, id, &mut form).unwrap();
    }

    let supervisor = ctx.persistence.get_supervisor(id).unwrap().unwrap();
    let current: String = format!("documents/pan_{id}.png");
    assert_eq!(supervisor.documents.pan_image.as_deref(), Some(current.as_str()));
    assert!(ctx.upload_dir.path().join(&current).exists());
    assert!(
        !ctx.upload_dir
            .path()
            .join(format!("documents/pan_{id}.jpg"))
            .exists()
    );
}

#[test]
fn test_delete_supervisor_refused_while_employees_assigned() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    let refused: ActionOutcome =
        delete_supervisor(&mut ctx.persistence, &ctx.store, &admin, ctx.supervisor_id).unwrap();

    assert_flash(
        &refused,
        FlashKind::Danger,
        "Cannot delete supervisor: 1 employee(s) still assigned.",
    );
    assert!(ctx.persistence.get_supervisor(ctx.supervisor_id).unwrap().is_some());

    delete_employee(&mut ctx.persistence, &ctx.store, &admin, employee_id).unwrap();
    let deleted: ActionOutcome =
        delete_supervisor(&mut ctx.persistence, &ctx.store, &admin, ctx.supervisor_id).unwrap();

    assert_flash(&deleted, FlashKind::Success, "Supervisor deleted successfully!");
    assert!(ctx.persistence.get_supervisor(ctx.supervisor_id).unwrap().is_none());
    assert!(ctx.persistence.get_user_by_login("meena").unwrap().is_none());
}

#[test]
fn test_delete_missing_supervisor_is_not_found() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();

    assert!(matches!(
        delete_supervisor(&mut ctx.persistence, &ctx.store, &admin, 999),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

// ============================================================================
// Approvals
// ============================================================================

#[test]
fn test_approval_queue_lists_pending_only() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let pending: i64 = add_test_employee(&mut ctx, "Asha", "Patil");
    let approved: i64 = add_test_employee(&mut ctx, "Bhavna", "Kale");
    review_employee(&mut ctx.persistence, &admin, approved, "accept").unwrap();

    let queue = approval_queue(&mut ctx.persistence, &admin).unwrap();

    let ids: Vec<i64> = queue.employees.iter().map(|e| e.employee_id).collect();
    assert_eq!(ids, vec![pending]);
    assert_eq!(queue.status, EmployeeStatus::Pending);
}

#[test]
fn test_accept_and_reject() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let first: i64 = add_test_employee(&mut ctx, "Asha", "Patil");
    let second: i64 = add_test_employee(&mut ctx, "Bhavna", "Kale");

    let accepted: ActionOutcome =
        review_employee(&mut ctx.persistence, &admin, first, "accept").unwrap();
    let rejected: ActionOutcome =
        review_employee(&mut ctx.persistence, &admin, second, "reject").unwrap();

    assert_flash(&accepted, FlashKind::Success, "Employee approved.");
    assert_flash(&rejected, FlashKind::Danger, "Employee rejected.");
    assert_eq!(accepted.redirect, "/admin/approve-employees");
    assert_eq!(employee_status(&mut ctx, first), EmployeeStatus::Approved);
    assert_eq!(employee_status(&mut ctx, second), EmployeeStatus::Rejected);
}

#[test]
fn test_review_can_reverse_a_decision() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    review_employee(&mut ctx.persistence, &admin, employee_id, "reject").unwrap();
    review_employee(&mut ctx.persistence, &admin, employee_id, "accept").unwrap();

    assert_eq!(
        employee_status(&mut ctx, employee_id),
        EmployeeStatus::Approved
    );
}

#[test]
fn test_unknown_review_action_changes_nothing() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    let outcome: ActionOutcome =
        review_employee(&mut ctx.persistence, &admin, employee_id, "promote").unwrap();

    assert!(outcome.flash.is_none());
    assert_eq!(outcome.redirect, "/admin/approve-employees");
    assert_eq!(employee_status(&mut ctx, employee_id), EmployeeStatus::Pending);
}

#[test]
fn test_review_missing_employee_is_not_found() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();

    assert!(matches!(
        review_employee(&mut ctx.persistence, &admin, 404, "accept"),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

// ============================================================================
// Employees
// ============================================================================

#[test]
fn test_list_employees_filters() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    add_test_employee(&mut ctx, "Asha", "Patil");
    add_test_employee(&mut ctx, "Bhavna", "Kale");

    let all: EmployeesView =
        list_employees(&mut ctx.persistence, &admin, &EmployeeQuery::default()).unwrap();
    assert_eq!(all.employees.len(), 2);
    assert_eq!(all.supervisors.len(), 1);
    assert_eq!(all.locations.len(), 1);

    let searched: EmployeesView = list_employees(
        &mut ctx.persistence,
        &admin,
        &EmployeeQuery {
            search: Some(String::from("  kale ")),
            ..EmployeeQuery::default()
        },
    )
    .unwrap();
    assert_eq!(searched.employees.len(), 1);
    assert_eq!(searched.employees[0].person.first_name, "Bhavna");
    assert_eq!(searched.filters.search.as_deref(), Some("  kale "));

    let garbage_id: EmployeesView = list_employees(
        &mut ctx.persistence,
        &admin,
        &EmployeeQuery {
            supervisor_id: Some(String::from("abc")),
            ..EmployeeQuery::default()
        },
    )
    .unwrap();
    assert_eq!(garbage_id.employees.len(), 2);

    let other_location: EmployeesView = list_employees(
        &mut ctx.persistence,
        &admin,
        &EmployeeQuery {
            location_id: Some(String::from("999")),
            ..EmployeeQuery::default()
        },
    )
    .unwrap();
    assert!(other_location.employees.is_empty());
}

#[test]
fn test_employee_detail_resolves_names() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    let view = employee_detail(&mut ctx.persistence, &admin, employee_id).unwrap();

    assert_eq!(view.employee.employee_id, employee_id);
    assert_eq!(view.supervisor_name.as_deref(), Some("Meena Rao"));
    assert_eq!(view.location_name.as_deref(), Some("Pune"));
}

#[test]
fn test_update_employee_admin_reassigns() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");
    let nashik: i64 = ctx.persistence.create_location("Nashik").unwrap();

    let mut form: SubmittedForm = employee_form("Asha", "Patil-Deshmukh");
    form.insert_field("supervisor_id", ctx.supervisor_id.to_string());
    form.insert_field("location_id", nashik.to_string());

    let outcome: ActionOutcome = update_employee_admin(
        &mut ctx.persistence,
        &ctx.store,
        &admin,
        employee_id,
        &mut form,
    )
    .unwrap();

    assert_flash(&outcome, FlashKind::Success, "Employee updated successfully.");
    assert_eq!(outcome.redirect, "/admin/employees");
    let employee: EmployeeData = ctx.persistence.get_employee(employee_id).unwrap().unwrap();
    assert_eq!(employee.location_id, nashik);
    assert_eq!(employee.person.last_name, "Patil-Deshmukh");
    assert_eq!(employee.person.ifsc, "HDFC0004321");
}

#[test]
fn test_update_employee_admin_rejects_unknown_supervisor() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    let mut form: SubmittedForm = employee_form("Asha", "Patil");
    form.insert_field("supervisor_id", "999");
    form.insert_field("location_id", ctx.location_id.to_string());

    let result = update_employee_admin(
        &mut ctx.persistence,
        &ctx.store,
        &admin,
        employee_id,
        &mut form,
    );

    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { ref errors }) if errors.contains("supervisor_id")
    ));
}

#[test]
fn test_delete_employee() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    let outcome: ActionOutcome =
        delete_employee(&mut ctx.persistence, &ctx.store, &admin, employee_id).unwrap();

    assert_flash(&outcome, FlashKind::Success, "Employee deleted successfully!");
    let remaining: EmployeesView =
        list_employees(&mut ctx.persistence, &admin, &EmployeeQuery::default()).unwrap();
    assert!(remaining.employees.is_empty());
    assert!(
        notifications(&mut ctx.persistence, &admin)
            .unwrap()
            .notifications
            .is_empty()
    );
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn test_notifications_and_mark_read() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    add_test_employee(&mut ctx, "Asha", "Patil");

    let before = notifications(&mut ctx.persistence, &admin).unwrap();
    assert_eq!(before.unread, 1);
    assert_eq!(before.notifications[0].employee_name, "Asha Patil");

    let outcome: ActionOutcome = mark_notification_read(
        &mut ctx.persistence,
        &admin,
        before.notifications[0].notification_id,
    )
    .unwrap();

    assert_eq!(outcome.redirect, "/admin/notifications");
    assert_eq!(notifications(&mut ctx.persistence, &admin).unwrap().unread, 0);
}

#[test]
fn test_review_marks_notifications_read() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();
    let employee_id: i64 = add_test_employee(&mut ctx, "Asha", "Patil");

    review_employee(&mut ctx.persistence, &admin, employee_id, "accept").unwrap();

    assert_eq!(notifications(&mut ctx.persistence, &admin).unwrap().unread, 0);
}

#[test]
fn test_mark_missing_notification_is_not_found() {
    let mut ctx: TestContext = setup_test_context();
    let admin = ctx.admin.clone();

    assert!(matches!(
        mark_notification_read(&mut ctx.persistence, &admin, 77),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
