// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn slot(code: &str) -> Slot {
    code.parse().unwrap()
}

const ROWS: &str = r#"[
    {"student": "alice", "schedule": "Tue2, Thu4", "start": "2026-01-05", "end": "2026-06-30"},
    {"student": "bob", "schedule": "Tue2", "start": "2026-01-05", "end": "2026-06-30"}
]"#;

#[tokio::test]
async fn missing_file_is_an_empty_roster() {
    let dir = tempfile::tempdir().unwrap();
    let roster = JsonFileRoster::new(dir.path().join("roster.json"));
    assert!(roster.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn lists_by_slot_and_student() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");
    std::fs::write(&path, ROWS).unwrap();
    let roster = JsonFileRoster::new(&path);

    assert_eq!(roster.list_all().await.unwrap().len(), 3);
    assert_eq!(roster.list_assignments(slot("Tue2")).await.unwrap().len(), 2);
    let alice = roster
        .list_student_assignments(&StudentId::from("alice"))
        .await
        .unwrap();
    assert_eq!(alice.len(), 2);
}

#[tokio::test]
async fn rewrite_persists_new_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");
    std::fs::write(&path, ROWS).unwrap();
    let roster = JsonFileRoster::new(&path);

    roster
        .rewrite_assignment_slot(&StudentId::from("bob"), slot("Tue2"), slot("Wed3"))
        .await
        .unwrap();

    let reread = JsonFileRoster::new(&path);
    let bob = reread
        .list_student_assignments(&StudentId::from("bob"))
        .await
        .unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].slot, slot("Wed3"));
    assert_eq!(reread.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn rewrite_of_missing_assignment_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");
    std::fs::write(&path, ROWS).unwrap();
    let roster = JsonFileRoster::new(&path);

    let err = roster
        .rewrite_assignment_slot(&StudentId::from("bob"), slot("Fri5"), slot("Wed3"))
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::NotFound { .. }));
}

#[tokio::test]
async fn malformed_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");
    std::fs::write(&path, "{not json").unwrap();
    let err = JsonFileRoster::new(&path).list_all().await.unwrap_err();
    assert!(matches!(err, RosterError::Storage(_)));
    assert!(!err.is_transient());
}
