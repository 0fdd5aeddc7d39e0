// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall::{MarkDecision, MarkPlan};
use rollcall_domain::{AttendanceStatus, EmployeeStatus};
use time::macros::date;

use super::{Fixture, add_employee, create_fixture, create_test_person};
use crate::{
    DashboardCounts, DocumentPaths, EMPLOYEE_PENDING, EmployeeData, EmployeeListFilter,
    NotificationData, PersistenceError,
};

#[test]
fn test_new_employee_is_pending_with_notification() {
    let mut fixture: Fixture = create_fixture();

    let employee_id: i64 = add_employee(&mut fixture, "Asha", "Patil");

    let employee: EmployeeData = fixture.persistence.get_employee(employee_id).unwrap().unwrap();
    assert_eq!(employee.status, EmployeeStatus::Pending);
    assert_eq!(employee.supervisor_id, fixture.supervisor_id);
    assert_eq!(employee.person.dob, date!(1990 - 05 - 17));

    let notifications: Vec<NotificationData> = fixture.persistence.list_notifications().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, EMPLOYEE_PENDING);
    assert_eq!(notifications[0].employee_id, employee_id);
    assert_eq!(notifications[0].employee_name, "Asha Patil");
    assert!(!notifications[0].is_read);
}

#[test]
fn test_review_sets_status_and_marks_notifications_read() {
    let mut fixture: Fixture = create_fixture();
    let employee_id: i64 = add_employee(&mut fixture, "Asha", "Patil");

    fixture
        .persistence
        .set_employee_status(employee_id, EmployeeStatus::Approved)
        .unwrap();

    let employee: EmployeeData = fixture.persistence.get_employee(employee_id).unwrap().unwrap();
    assert_eq!(employee.status, EmployeeStatus::Approved);
    assert!(fixture.persistence.list_notifications().unwrap()[0].is_read);
    assert_eq!(fixture.persistence.dashboard_counts().unwrap().unread_notifications, 0);
}

#[test]
fn test_review_of_missing_employee_is_not_found() {
    let mut fixture: Fixture = create_fixture();

    let result: Result<(), PersistenceError> = fixture
        .persistence
        .set_employee_status(77, EmployeeStatus::Rejected);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_mark_single_notification_read() {
    let mut fixture: Fixture = create_fixture();
    add_employee(&mut fixture, "Asha", "Patil");
    add_employee(&mut fixture, "Ravi", "Kumar");

    let newest: NotificationData = fixture.persistence.list_notifications().unwrap()[0].clone();
    assert_eq!(newest.employee_name, "Ravi Kumar");

    fixture
        .persistence
        .mark_notification_read(newest.notification_id)
        .unwrap();

    let counts: DashboardCounts = fixture.persistence.dashboard_counts().unwrap();
    assert_eq!(counts.unread_notifications, 1);
    assert!(matches!(
        fixture.persistence.mark_notification_read(9999),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_list_employees_filters_and_orders_by_name() {
    let mut fixture: Fixture = create_fixture();
    let ravi: i64 = add_employee(&mut fixture, "Ravi", "Kumar");
    let asha: i64 = add_employee(&mut fixture, "Asha", "Patil");
    fixture
        .persistence
        .set_employee_status(ravi, EmployeeStatus::Approved)
        .unwrap();

    let all: Vec<i64> = fixture
        .persistence
        .list_employees(&EmployeeListFilter::default())
        .unwrap()
        .into_iter()
        .map(|e| e.employee_id)
        .collect();
    assert_eq!(all, vec![asha, ravi]);

    let pending: Vec<EmployeeData> = fixture
        .persistence
        .list_employees(&EmployeeListFilter {
            status: Some(EmployeeStatus::Pending),
            ..EmployeeListFilter::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].employee_id, asha);

    let at_location: Vec<EmployeeData> = fixture
        .persistence
        .list_employees(&EmployeeListFilter {
            location_id: Some(fixture.location_id),
            supervisor_id: Some(fixture.supervisor_id),
            ..EmployeeListFilter::default()
        })
        .unwrap();
    assert_eq!(at_location.len(), 2);
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let mut fixture: Fixture = create_fixture();
    let asha: i64 = add_employee(&mut fixture, "Asha", "Patil");
    add_employee(&mut fixture, "Ravi", "Kumar");

    let found: Vec<EmployeeData> = fixture
        .persistence
        .list_employees(&EmployeeListFilter {
            search: Some(String::from("pat")),
            ..EmployeeListFilter::default()
        })
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].employee_id, asha);

    // Wildcards in the term are literal.
    let none: Vec<EmployeeData> = fixture
        .persistence
        .list_employees(&EmployeeListFilter {
            search: Some(String::from("%")),
            ..EmployeeListFilter::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_update_employee_rewrites_profile() {
    let mut fixture: Fixture = create_fixture();
    let employee_id: i64 = add_employee(&mut fixture, "Asha", "Patil");
    let mut person = create_test_person("Asha", "Deshmukh");
    person.middle_name = Some(String::from("R"));
    let documents: DocumentPaths = DocumentPaths {
        pan_image: Some(String::from("abc_pan.png")),
        ..DocumentPaths::default()
    };

    fixture
        .persistence
        .update_employee(
            employee_id,
            fixture.supervisor_id,
            fixture.location_id,
            &person,
            &documents,
        )
        .unwrap();

    let employee: EmployeeData = fixture.persistence.get_employee(employee_id).unwrap().unwrap();
    assert_eq!(employee.person.last_name, "Deshmukh");
    assert_eq!(employee.person.middle_name.as_deref(), Some("R"));
    assert_eq!(employee.documents.pan_image.as_deref(), Some("abc_pan.png"));
    assert_eq!(employee.status, EmployeeStatus::Pending);

    let missing: Result<(), PersistenceError> = fixture.persistence.update_employee(
        employee_id + 10,
        fixture.supervisor_id,
        fixture.location_id,
        &person,
        &documents,
    );
    assert!(matches!(missing, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_delete_employee_cascades_attendance_and_notifications() {
    let mut fixture: Fixture = create_fixture();
    let employee_id: i64 = add_employee(&mut fixture, "Asha", "Patil");
    let plan: MarkPlan = MarkPlan {
        date: date!(2026 - 10 - 14),
        marked_by: fixture.supervisor_user_id,
        decisions: vec![MarkDecision::Record {
            employee_id,
            status: AttendanceStatus::Present,
            overtime_hours: 0.0,
        }],
    };
    fixture.persistence.mark_attendance(&plan).unwrap();

    fixture.persistence.delete_employee(employee_id).unwrap();

    assert!(fixture.persistence.get_employee(employee_id).unwrap().is_none());
    assert!(fixture.persistence.list_notifications().unwrap().is_empty());
    assert!(
        fixture
            .persistence
            .week_ledger(&[employee_id], date!(2026 - 10 - 12), date!(2026 - 10 - 18))
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        fixture.persistence.delete_employee(employee_id),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_dashboard_counts() {
    let mut fixture: Fixture = create_fixture();
    let asha: i64 = add_employee(&mut fixture, "Asha", "Patil");
    add_employee(&mut fixture, "Ravi", "Kumar");
    fixture
        .persistence
        .set_employee_status(asha, EmployeeStatus::Approved)
        .unwrap();

    assert_eq!(
        fixture.persistence.dashboard_counts().unwrap(),
        DashboardCounts {
            locations: 1,
            supervisors: 1,
            employees: 2,
            pending_employees: 1,
            unread_notifications: 1,
        }
    );
}
