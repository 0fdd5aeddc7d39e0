// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::DocumentKind;
use rollcall_persistence::DocumentPaths;
use tempfile::TempDir;

use super::helpers::image;
use crate::{DocumentNaming, DocumentStore, UploadedFile, content_type, sanitize_file_name};

fn temp_store() -> (TempDir, DocumentStore) {
    let dir: TempDir = TempDir::new().unwrap();
    let store: DocumentStore = DocumentStore::new(dir.path());
    (dir, store)
}

#[test]
fn test_unique_names_land_in_subdirectory() {
    let (_dir, store) = temp_store();
    let upload: UploadedFile = image("my photo.png");

    let stored: DocumentPaths = store
        .store_all(
            &[(DocumentKind::Profile, &upload)],
            DocumentNaming::Unique {
                subdir: "employees",
            },
        )
        .unwrap();

    let relative: &str = stored.get(DocumentKind::Profile).unwrap();
    assert!(relative.starts_with("employees/"));
    assert!(relative.ends_with("_my_photo.png"));
    assert!(stored.get(DocumentKind::Pan).is_none());

    let on_disk = store.resolve(relative).unwrap();
    assert_eq!(std::fs::read(on_disk).unwrap(), upload.bytes);
}

#[test]
fn test_unique_names_do_not_collide() {
    let (_dir, store) = temp_store();
    let upload: UploadedFile = image("scan.jpg");
    let naming = DocumentNaming::Unique { subdir: "employees" };

    let first: DocumentPaths = store
        .store_all(&[(DocumentKind::Aadhaar, &upload)], naming)
        .unwrap();
    let second: DocumentPaths = store
        .store_all(&[(DocumentKind::Aadhaar, &upload)], naming)
        .unwrap();

    assert_ne!(
        first.get(DocumentKind::Aadhaar),
        second.get(DocumentKind::Aadhaar)
    );
}

#[test]
fn test_deterministic_names_follow_owner_and_kind() {
    let (_dir, store) = temp_store();
    let profile: UploadedFile = image("Face.PNG");
    let aadhaar: UploadedFile = image("card.jpg");

    let stored: DocumentPaths = store
        .store_all(
            &[
                (DocumentKind::Profile, &profile),
                (DocumentKind::Aadhaar, &aadhaar),
            ],
            DocumentNaming::Deterministic { owner_id: 7 },
        )
        .unwrap();

    assert_eq!(
        stored.get(DocumentKind::Profile).map(String::as_str),
        Some("profiles/profile_7.png")
    );
    assert_eq!(
        stored.get(DocumentKind::Aadhaar).map(String::as_str),
        Some("documents/aadhaar_7.jpg")
    );
    assert!(store.root().join("documents/aadhaar_7.jpg").exists());
}

#[test]
fn test_discard_all_removes_stored_files() {
    let (_dir, store) = temp_store();
    let upload: UploadedFile = image("pan.png");

    let stored: DocumentPaths = store
        .store_all(
            &[(DocumentKind::Pan, &upload)],
            DocumentNaming::Deterministic { owner_id: 3 },
        )
        .unwrap();
    store.discard_all(&stored);

    assert!(!store.root().join("documents/pan_3.png").exists());
}

#[test]
fn test_resolve_rejects_paths_outside_root() {
    let (_dir, store) = temp_store();

    assert!(store.resolve("../x").is_none());
    assert!(store.resolve("employees/../../x").is_none());
    assert!(store.resolve("/etc/passwd").is_none());
    assert!(store.resolve("").is_none());
    assert_eq!(
        store.resolve("profiles/profile_1.png"),
        Some(store.root().join("profiles/profile_1.png"))
    );
}

#[test]
fn test_sanitize_file_name() {
    assert_eq!(sanitize_file_name("../../evil name.png"), "evil_name.png");
    assert_eq!(sanitize_file_name("C:\\photos\\id card.jpg"), "id_card.jpg");
    assert_eq!(sanitize_file_name(".hidden"), "hidden");
    assert_eq!(sanitize_file_name("..."), "upload");
}

#[test]
fn test_content_type_by_extension() {
    assert_eq!(content_type("profiles/profile_1.PNG"), "image/png");
    assert_eq!(content_type("documents/pan_1.jpeg"), "image/jpeg");
    assert_eq!(content_type("documents/pan_1.jpg"), "image/jpeg");
    assert_eq!(content_type("notes.txt"), "application/octet-stream");
}
