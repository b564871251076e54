//! Makeup request specs

use crate::prelude::*;

fn alice_to_thursday(studio: &Studio) -> Run {
    studio
        .sk()
        .args(&[
            "makeup",
            "request",
            "alice",
            "--from",
            "Tue2@2026-02-10",
            "--to",
            "Thu4@2026-02-12",
        ])
        .passes()
}

#[test]
fn makeup_moves_a_student_for_one_class() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    alice_to_thursday(&studio)
        .stdout_has("alice 2026-02-10 Tue2 -> 2026-02-12 Thu4 active")
        .stdout_has("event makeup:booked (alice)");

    studio
        .sk()
        .args(&["occupancy", "Thu4", "2026-02-12"])
        .passes()
        .stdout_has("2/7 seats used")
        .stdout_has("  alice (makeup-in)");
    studio
        .sk()
        .args(&["occupancy", "Tue2", "2026-02-10"])
        .passes()
        .stdout_has("1/7 seats used")
        .stdout_has("- alice (makeup-out)");
}

#[test]
fn makeup_into_a_full_class_is_refused() {
    let mut rows = full_slot_rows("Thu4", 7);
    rows.push(
        r#"{"student": "alice", "schedule": "Tue2", "start": "2026-01-05", "end": "2026-06-30"}"#
            .to_string(),
    );
    let studio = Studio::with_rows(&rows);
    studio
        .sk()
        .args(&[
            "makeup",
            "request",
            "alice",
            "--from",
            "Tue2@2026-02-10",
            "--to",
            "Thu4@2026-02-12",
        ])
        .fails_with(3)
        .stderr_has("CapacityOK")
        .stderr_has("sk waitlist request");
}

#[test]
fn makeup_closes_thirty_minutes_before_the_class() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    let request = [
        "makeup",
        "request",
        "alice",
        "--from",
        "Tue2@2026-02-17",
        "--to",
        "Thu4@2026-02-12",
    ];

    studio
        .sk_at("2026-02-12T14:05")
        .args(&request)
        .fails_with(3)
        .stderr_has("TimeCutoffOK");
    studio.sk_at("2026-02-12T13:59").args(&request).passes();
}

#[test]
fn makeup_cancel_accepts_an_id_prefix() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    let id = created_id(
        &studio
            .sk()
            .args(&[
                "makeup",
                "request",
                "alice",
                "--from",
                "Tue2@2026-02-10",
                "--to",
                "Thu4@2026-02-12",
            ])
            .json()
            .passes(),
    );

    studio
        .sk()
        .args(&["makeup", "cancel", &id[..8]])
        .passes()
        .stdout_has("cancelled")
        .stdout_has("event makeup:cancelled (alice)");
    studio
        .sk()
        .args(&["makeup", "cancel", &id])
        .fails_with(5)
        .stderr_has("already cancelled");
}

#[test]
fn finished_makeups_complete_on_the_next_call() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    let id = created_id(
        &studio
            .sk()
            .args(&[
                "makeup",
                "request",
                "alice",
                "--from",
                "Tue2@2026-02-10",
                "--to",
                "Thu4@2026-02-12",
            ])
            .json()
            .passes(),
    );

    studio
        .sk_at("2026-02-12T16:10")
        .args(&["makeup", "cancel", &id])
        .fails_with(5)
        .stderr_has("already completed");
}
