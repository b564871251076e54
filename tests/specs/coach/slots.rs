//! Coach control specs: slot flags, holidays, conflicts

use crate::prelude::*;

#[test]
fn disabling_a_slot_cancels_its_classes() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio
        .sk()
        .args(&["slot", "toggle-disabled", "Tue2"])
        .passes()
        .stdout_has("slot Tue2 disabled")
        .stdout_has("event slot:disabled");

    studio
        .sk()
        .args(&["occupancy", "Tue2", "2026-02-10"])
        .passes()
        .stdout_has("0 available [no class]");

    studio
        .sk()
        .args(&["slot", "toggle-disabled", "Tue2"])
        .passes()
        .stdout_has("slot Tue2 enabled")
        .stdout_has("event slot:enabled");
}

#[test]
fn lock_blocks_makeups_on_one_date_only() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio
        .sk()
        .args(&["slot", "toggle-lock", "Thu4", "2026-02-12"])
        .passes()
        .stdout_has("slot Thu4 enabled, locked on 2026-02-12");

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
        .stderr_has("SlotUnlocked");
    studio
        .sk()
        .args(&[
            "makeup",
            "request",
            "alice",
            "--from",
            "Tue2@2026-02-10",
            "--to",
            "Thu4@2026-02-19",
        ])
        .passes();
}

#[test]
fn lock_date_must_fall_on_the_slot() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["slot", "toggle-lock", "Thu4", "2026-02-11"])
        .fails_with(3)
        .stderr_has("DateMatchesSlot");
}

#[test]
fn holidays_show_on_the_week_and_refuse_makeups() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio
        .sk()
        .args(&["holiday", "add", "2026-02-11", "Founders", "day"])
        .passes()
        .stdout_has("holiday 2026-02-11 Founders day")
        .stdout_has("event holiday:added");

    studio
        .sk()
        .args(&["week", "2026-02-09"])
        .passes()
        .stdout_has("holiday: Founders day");
    studio
        .sk()
        .args(&[
            "makeup",
            "request",
            "alice",
            "--from",
            "Tue2@2026-02-10",
            "--to",
            "Wed3@2026-02-11",
        ])
        .fails_with(3)
        .stderr_has("NotHoliday");
}

#[test]
fn no_conflicts_on_a_fresh_studio() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["conflict", "list"])
        .passes()
        .stdout_eq("No conflicts\n");
}

#[test]
fn conflict_list_json_is_an_array() {
    let run = Studio::empty()
        .sk()
        .args(&["conflict", "list"])
        .json()
        .passes();
    assert_eq!(run.json(), serde_json::json!([]));
}
