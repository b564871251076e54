//! Week view specs

use crate::prelude::*;

#[test]
fn week_lists_every_slot_with_seat_counts() {
    Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["week", "2026-02-11"])
        .passes()
        .stdout_has("Week of 2026-02-09")
        .stdout_has("Mon1   2026-02-09  0/7    7")
        .stdout_has("Tue2   2026-02-10  2/7    5")
        .stdout_has("Fri6   2026-02-13  0/7    7");
}

#[test]
fn week_defaults_to_the_current_week() {
    Studio::with_roster(SMALL_ROSTER)
        .sk_at("2026-02-18T12:00")
        .args(&["week"])
        .passes()
        .stdout_has("Week of 2026-02-16");
}

#[test]
fn week_json_has_one_cell_per_slot() {
    let run = Studio::with_roster(SMALL_ROSTER)
        .sk()
        .args(&["week", "2026-02-09"])
        .json()
        .passes();
    let view = run.json();
    assert_eq!(view["week_start"], "2026-02-09");
    let cells = view["cells"].as_object().unwrap();
    assert_eq!(cells.len(), 30);
    assert_eq!(cells["Thu4"]["seats_used"], 1);
}

#[test]
fn config_file_sets_capacity() {
    let studio = Studio::with_roster(SMALL_ROSTER);
    studio.file("seatkeeper.toml", "capacity = 2\n");
    studio
        .sk()
        .args(&["week", "2026-02-09"])
        .passes()
        .stdout_has("Tue2   2026-02-10  2/2    0     full");
}
