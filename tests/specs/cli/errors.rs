//! Error reporting specs
//!
//! Each scheduler failure kind has its own exit status.

use crate::prelude::*;

#[test]
fn unknown_id_is_not_found() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["makeup", "cancel", "mk-missing"])
        .fails_with(4)
        .stderr_has("makeup mk-missing not found")
        .stderr_has("unique prefix");
}

#[test]
fn json_errors_go_to_stdout() {
    let run = Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["absence", "cancel", "ab-missing"])
        .json()
        .fails_with(4);
    let body = run.json();
    assert_eq!(body["error"]["kind"], "not_found");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("ab-missing"));
}

#[test]
fn policy_failures_name_the_check() {
    let run = Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["absence", "request", "carol", "2026-02-10"])
        .json()
        .fails_with(3);
    let body = run.json();
    assert_eq!(body["error"]["kind"], "validation_failed");
    assert_eq!(body["error"]["predicate"], "CoversOccurrence");
}

#[test]
fn unknown_period_is_rejected() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["occupancy", "Tue9", "2026-02-10"])
        .fails_with(3)
        .stderr_has("KnownSlot");
}

#[test]
fn malformed_slot_is_a_usage_error() {
    Studio::empty()
        .sk()
        .args(&["occupancy", "Sun1", "2026-02-15"])
        .fails_with(2);
}

#[test]
fn bad_config_fails_before_any_command() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio.file("seatkeeper.toml", "capacity = 0\n");
    studio
        .sk()
        .args(&["week"])
        .fails_with(1)
        .stderr_has("seatkeeper.toml");
}
