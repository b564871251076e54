//! Single-class occupancy specs

use crate::prelude::*;

#[test]
fn occupancy_lists_attending_students() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["occupancy", "Tue2", "2026-02-10"])
        .passes()
        .stdout_eq("2026-02-10 Tue2  2/7 seats used, 5 available\n  alice\n  bob\n");
}

#[test]
fn absent_students_are_listed_apart() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio
        .sk()
        .args(&["absence", "request", "bob", "2026-02-10"])
        .passes()
        .stdout_has("event absence:recorded (bob)");

    studio
        .sk()
        .args(&["occupancy", "Tue2", "2026-02-10"])
        .passes()
        .stdout_eq("2026-02-10 Tue2  1/7 seats used, 6 available\n  alice\n  - bob (absence)\n");
}

#[test]
fn agreed_absences_come_from_roster_notes() {
    let studio = Studio::with_roster(
        r#"[{"student": "dana", "schedule": "Fri5", "start": "2026-01-05", "end": "2026-06-30", "notes": "agreed 2/13"}]"#,
    );
    studio
        .sk()
        .args(&["occupancy", "Fri5", "2026-02-13"])
        .passes()
        .stdout_has("0/7 seats used")
        .stdout_has("- dana (agreed-absence)");
}

#[test]
fn student_week_shows_own_classes() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["student", "carol", "2026-02-09"])
        .passes()
        .stdout_eq("2026-02-12 Thu4  regular\n");
}

#[test]
fn unknown_student_has_no_classes() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["student", "zed"])
        .passes()
        .stdout_eq("No classes for zed\n");
}
