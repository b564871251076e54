//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command_group() {
    let run = Studio::empty().sk().args(&["--help"]).passes();
    for group in [
        "week",
        "occupancy",
        "student",
        "holding",
        "absence",
        "makeup",
        "waitlist",
        "slot",
        "holiday",
        "conflict",
    ] {
        assert!(run.stdout().contains(group), "help lacks {group}");
    }
}

#[test]
fn makeup_help_explains_occurrence_format() {
    Studio::empty()
        .sk()
        .args(&["makeup", "request", "--help"])
        .passes()
        .stdout_has("SLOT@DATE");
}
