//! Waitlist specs

use crate::prelude::*;

fn full_thursday_with_bob() -> Vec<String> {
    let mut rows = full_slot_rows("Thu4", 7);
    rows.push(
        r#"{"student": "bob", "schedule": "Tue2", "start": "2026-01-05", "end": "2026-06-30"}"#
            .to_string(),
    );
    rows
}

#[test]
fn waitlist_round_trip_rewrites_the_roster() {
    let rows = full_thursday_with_bob();
    let studio = Studio::with_rows(&rows);
    let id = created_id(
        &studio
            .sk()
            .args(&["waitlist", "request", "bob", "Tue2", "Thu4"])
            .json()
            .passes(),
    );

    studio
        .sk()
        .args(&["waitlist", "accept", &id])
        .fails_with(3)
        .stderr_has("ValidTransition");

    // s7 leaves Thursday
    let remaining: Vec<String> = rows.into_iter().filter(|r| !r.contains("\"s7\"")).collect();
    studio.file("roster.json", &format!("[{}]", remaining.join(",")));

    studio
        .sk()
        .args(&["waitlist", "accept", &id])
        .passes()
        .stdout_has("bob Tue2 -> Thu4 accepted")
        .stdout_has("event waitlist:notified (bob)")
        .stdout_has("event waitlist:accepted (bob)");

    studio
        .sk()
        .args(&["student", "bob", "2026-02-16"])
        .passes()
        .stdout_eq("2026-02-19 Thu4  regular\n");
}

#[test]
fn waitlist_needs_a_full_slot() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["waitlist", "request", "bob", "Tue2", "Thu4"])
        .fails_with(3)
        .stderr_has("WaitlistRequiresFull");
}

#[test]
fn cancelled_waitlist_is_final() {
    let studio = Studio::with_rows(&full_thursday_with_bob());
    let id = created_id(
        &studio
            .sk()
            .args(&["waitlist", "request", "bob", "Tue2", "Thu4"])
            .json()
            .passes(),
    );
    studio
        .sk()
        .args(&["waitlist", "cancel", &id])
        .passes()
        .stdout_has("cancelled");
    studio
        .sk()
        .args(&["waitlist", "cancel", &id])
        .fails_with(5);
}
