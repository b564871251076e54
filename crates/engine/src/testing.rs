// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for scheduler unit tests

use crate::{Scheduler, SchedulerDeps};
use chrono::{NaiveDate, NaiveDateTime};
use sk_adapters::{FakeOverlayStore, FakeRosterProvider};
use sk_core::{FakeClock, Occurrence, RosterAssignment, SchedulerConfig, SequentialIdGen, Slot};

pub type TestScheduler =
    Scheduler<FakeRosterProvider, FakeOverlayStore, FakeClock, SequentialIdGen>;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

pub fn slot(code: &str) -> Slot {
    code.parse().unwrap()
}

pub fn occ(d: &str, code: &str) -> Occurrence {
    Occurrence::new(date(d), slot(code))
}

pub fn enrolled(student: &str, code: &str) -> RosterAssignment {
    RosterAssignment::new(student, slot(code), date("2026-01-05"), date("2026-06-30"))
}

/// `count` filler students on `code`
pub fn filled(code: &str, count: usize) -> Vec<RosterAssignment> {
    (0..count)
        .map(|i| enrolled(&format!("{code}-{i}"), code))
        .collect()
}

pub struct Harness {
    pub scheduler: TestScheduler,
    pub roster: FakeRosterProvider,
    pub overlay: FakeOverlayStore,
    pub clock: FakeClock,
}

impl Harness {
    pub fn new(assignments: Vec<RosterAssignment>, now: &str) -> Self {
        let roster = FakeRosterProvider::with_assignments(assignments);
        let overlay = FakeOverlayStore::new();
        let clock = FakeClock::at(at(now));
        let scheduler = Scheduler::new(
            SchedulerDeps {
                roster: roster.clone(),
                overlay: overlay.clone(),
            },
            SchedulerConfig::default(),
            clock.clone(),
            SequentialIdGen::new(),
        );
        Self {
            scheduler,
            roster,
            overlay,
            clock,
        }
    }
}
