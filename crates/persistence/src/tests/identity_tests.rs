// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::Role;

use crate::{Persistence, PersistenceError, SessionData, UserData};

#[test]
fn test_create_user_normalizes_login_and_hashes_password() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let user_id: i64 = persistence
        .create_user("  Admin ", "Administrator", "admin123", Role::Admin)
        .unwrap();

    let user: UserData = persistence.get_user_by_login("ADMIN").unwrap().unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(user.login_name, "admin");
    assert_eq!(user.role, Role::Admin);
    assert_ne!(user.password_hash, "admin123");
    assert!(Persistence::verify_password("admin123", &user.password_hash).unwrap());
    assert!(!Persistence::verify_password("admin124", &user.password_hash).unwrap());
}

#[test]
fn test_duplicate_login_is_a_unique_violation() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_user("admin", "Administrator", "admin123", Role::Admin)
        .unwrap();

    let result: Result<i64, PersistenceError> =
        persistence.create_user("Admin", "Other", "other-pass", Role::Supervisor);

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_unknown_login_returns_none() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(persistence.get_user_by_login("ghost").unwrap(), None);
    assert_eq!(persistence.get_user_by_id(42).unwrap(), None);
}

#[test]
fn test_ensure_admin_is_idempotent() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.ensure_admin("admin", "admin123").unwrap());
    assert!(!persistence.ensure_admin("admin", "changed").unwrap());

    let user: UserData = persistence.get_user_by_login("admin").unwrap().unwrap();
    assert_eq!(user.role, Role::Admin);
    assert!(Persistence::verify_password("admin123", &user.password_hash).unwrap());
}

#[test]
fn test_update_last_login_stamps_user() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let user_id: i64 = persistence
        .create_user("admin", "Administrator", "admin123", Role::Admin)
        .unwrap();
    assert!(persistence.get_user_by_id(user_id).unwrap().unwrap().last_login_at.is_none());

    persistence.update_last_login(user_id).unwrap();

    assert!(persistence.get_user_by_id(user_id).unwrap().unwrap().last_login_at.is_some());
}

#[test]
fn test_session_lifecycle() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let user_id: i64 = persistence
        .create_user("admin", "Administrator", "admin123", Role::Admin)
        .unwrap();

    let session_id: i64 = persistence
        .create_session("token-a", user_id, "2099-01-01T00:00:00.000000000Z")
        .unwrap();
    let session: SessionData = persistence.get_session_by_token("token-a").unwrap().unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.user_id, user_id);

    persistence.update_session_activity(session_id).unwrap();
    persistence.delete_session("token-a").unwrap();

    assert_eq!(persistence.get_session_by_token("token-a").unwrap(), None);
}

#[test]
fn test_expired_sessions_are_purged() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let user_id: i64 = persistence
        .create_user("admin", "Administrator", "admin123", Role::Admin)
        .unwrap();
    persistence
        .create_session("old", user_id, "2020-01-01T00:00:00.000000000Z")
        .unwrap();
    persistence
        .create_session("fresh", user_id, "2099-01-01T00:00:00.000000000Z")
        .unwrap();

    let purged: usize = persistence
        .delete_expired_sessions("2026-10-17T00:00:00.000000000Z")
        .unwrap();

    assert_eq!(purged, 1);
    assert!(persistence.get_session_by_token("old").unwrap().is_none());
    assert!(persistence.get_session_by_token("fresh").unwrap().is_some());
}

#[test]
fn test_delete_sessions_for_user_counts_rows() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let user_id: i64 = persistence
        .create_user("admin", "Administrator", "admin123", Role::Admin)
        .unwrap();
    persistence.create_session("a", user_id, "2099-01-01").unwrap();
    persistence.create_session("b", user_id, "2099-01-01").unwrap();

    assert_eq!(persistence.delete_sessions_for_user(user_id).unwrap(), 2);
    assert_eq!(persistence.delete_sessions_for_user(user_id).unwrap(), 0);
}
