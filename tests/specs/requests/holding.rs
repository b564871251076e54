//! Holding and absence specs

use crate::prelude::*;

#[test]
fn holding_suppresses_classes_and_extends_enrollment() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio
        .sk()
        .args(&["holding", "request", "alice", "2026-02-09", "2026-02-22"])
        .passes()
        .stdout_has("alice 2026-02-09..2026-02-22 active")
        .stdout_has("event holding:requested (alice)");

    studio
        .sk()
        .args(&["occupancy", "Tue2", "2026-02-17"])
        .passes()
        .stdout_has("- alice (holding)");
    studio
        .sk()
        .args(&["holding", "extension", "alice"])
        .passes()
        .stdout_has("suppressed classes: 2")
        .stdout_has("enrollment end: 2026-06-30 -> 2026-07-14");
}

#[test]
fn one_holding_per_enrollment_cycle() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio
        .sk()
        .args(&["holding", "request", "alice", "2026-02-09", "2026-02-15"])
        .passes();
    studio
        .sk()
        .args(&["holding", "request", "alice", "2026-03-02", "2026-03-08"])
        .fails_with(3)
        .stderr_has("OneActiveHoldingPerCycle");
}

#[test]
fn holding_cancel_closes_before_the_first_class() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    let id = created_id(
        &studio
            .sk()
            .args(&["holding", "request", "bob", "2026-02-10", "2026-02-20"])
            .json()
            .passes(),
    );

    studio
        .sk_at("2026-02-10T10:00")
        .args(&["holding", "cancel", &id])
        .fails_with(3)
        .stderr_has("AlreadyStarted");
    studio
        .sk_at("2026-02-10T09:00")
        .args(&["holding", "cancel", &id])
        .passes()
        .stdout_has("event holding:cancelled (bob)");
}

#[test]
fn extension_without_a_holding_is_not_found() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["holding", "extension", "carol"])
        .fails_with(4);
}

#[test]
fn absence_cancel_restores_the_seat() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    let id = created_id(
        &studio
            .sk()
            .args(&["absence", "request", "carol", "2026-02-12"])
            .json()
            .passes(),
    );
    studio
        .sk()
        .args(&["absence", "cancel", &id])
        .passes()
        .stdout_has("event absence:cancelled (carol)");
    studio
        .sk()
        .args(&["occupancy", "Thu4", "2026-02-12"])
        .passes()
        .stdout_eq("2026-02-12 Thu4  1/7 seats used, 6 available\n  carol\n");
}
