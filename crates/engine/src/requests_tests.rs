// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Student request lifecycle tests

use crate::testing::*;
use crate::{ScheduleError, Scheduler, SchedulerDeps};
use async_trait::async_trait;
use sk_adapters::{FakeOverlayStore, FakeRosterProvider, OverlayCall, RosterError, RosterProvider};
use sk_core::{
    Event, FakeClock, MakeupRequest, RosterAssignment, SchedulerConfig, SequentialIdGen, Slot,
    SlotFlags, StudentId, WaitlistStatus,
};
use sk_storage::OverlayOp;
use yare::parameterized;

fn alice() -> StudentId {
    StudentId::from("alice")
}

const MONDAY_NOON: &str = "2026-02-09 12:00";

// =============================================================================
// Holding
// =============================================================================

#[tokio::test]
async fn holding_is_one_per_cycle() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);

    let first = h
        .scheduler
        .request_holding(&alice(), date("2026-02-10"), date("2026-02-12"))
        .await
        .unwrap();
    assert!(matches!(
        first.events.as_slice(),
        [Event::HoldingRequested { suppressed: 1, .. }]
    ));

    let err = h
        .scheduler
        .request_holding(&alice(), date("2026-03-03"), date("2026-03-05"))
        .await
        .unwrap_err();
    assert_eq!(err.predicate(), Some("OneActiveHoldingPerCycle"));
}

#[tokio::test]
async fn holding_without_classes_is_rejected() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let err = h
        .scheduler
        .request_holding(&alice(), date("2026-02-11"), date("2026-02-13"))
        .await
        .unwrap_err();
    assert_eq!(err.predicate(), Some("CoversOccurrence"));
}

#[parameterized(
    an_hour_ahead = { "2026-02-10 09:29", true },
    at_the_cutoff = { "2026-02-10 09:30", false },
    after_class = { "2026-02-10 11:00", false },
)]
#[test_macro(tokio::test)]
async fn holding_cancel_window(now: &str, allowed: bool) {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let holding = h
        .scheduler
        .request_holding(&alice(), date("2026-02-10"), date("2026-02-12"))
        .await
        .unwrap()
        .value;

    h.clock.set(at(now));
    let result = h.scheduler.cancel_holding(&holding.id.0).await;

    match result {
        Ok(_) => assert!(allowed, "cancel at {now} should fail"),
        Err(e) => {
            assert!(!allowed, "cancel at {now} failed: {e}");
            assert_eq!(e.predicate(), Some("AlreadyStarted"));
        }
    }
}

#[tokio::test]
async fn cancelled_holding_is_terminal() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let holding = h
        .scheduler
        .request_holding(&alice(), date("2026-02-10"), date("2026-02-12"))
        .await
        .unwrap()
        .value;

    h.scheduler.cancel_holding(&holding.id.0).await.unwrap();
    let err = h.scheduler.cancel_holding(&holding.id.0).await.unwrap_err();
    assert!(matches!(err, ScheduleError::AlreadyTerminal { .. }));
}

// =============================================================================
// Absence
// =============================================================================

#[tokio::test]
async fn absence_displaces_the_student() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    h.scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap();

    let result = h
        .scheduler
        .get_occupancy(slot("Tue2"), date("2026-02-10"))
        .await
        .unwrap();
    assert_eq!(result.reason_for(&alice()), Some("absence"));

    let err = h
        .scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap_err();
    assert_eq!(err.predicate(), Some("NoDuplicateAbsence"));
}

#[tokio::test]
async fn absence_needs_a_class_that_has_not_started() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let err = h
        .scheduler
        .request_absence(&alice(), date("2026-02-11"))
        .await
        .unwrap_err();
    assert_eq!(err.predicate(), Some("CoversOccurrence"));

    h.clock.set(at("2026-02-10 10:30"));
    let err = h
        .scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap_err();
    assert_eq!(err.predicate(), Some("TimeCutoffOK"));
}

#[tokio::test]
async fn absence_cancel_restores_attendance() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let absence = h
        .scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap()
        .value;

    h.scheduler.cancel_absence(&absence.id.0).await.unwrap();

    let result = h
        .scheduler
        .get_occupancy(slot("Tue2"), date("2026-02-10"))
        .await
        .unwrap();
    assert!(result.attending.contains(&alice()));
}

// =============================================================================
// Makeup
// =============================================================================

#[tokio::test]
async fn makeup_commits_with_a_guard() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);

    let outcome = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap();

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].name(), "makeup:booked");
    assert!(h.overlay.calls().contains(&OverlayCall::Apply {
        op: "put_makeup",
        guarded: true
    }));
}

#[tokio::test]
async fn makeup_into_full_class_is_rejected() {
    let mut roster = filled("Thu4", 7);
    roster.push(enrolled("alice", "Tue2"));
    let h = Harness::new(roster, MONDAY_NOON);

    let err = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap_err();
    assert_eq!(err.predicate(), Some("CapacityOK"));
}

#[tokio::test]
async fn racing_booking_is_a_capacity_conflict() {
    let mut roster = filled("Thu4", 6);
    roster.push(enrolled("alice", "Tue2"));
    roster.push(enrolled("bob", "Wed3"));
    let h = Harness::new(roster, MONDAY_NOON);
    h.overlay.race_next_apply(OverlayOp::PutMakeup(MakeupRequest::new(
        "mk-racer",
        StudentId::from("bob"),
        occ("2026-02-11", "Wed3"),
        occ("2026-02-12", "Thu4"),
        at(MONDAY_NOON),
    )));

    let err = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "capacity_conflict");
    let makeups = h.overlay.peek().makeups;
    assert_eq!(makeups.len(), 1);
    assert_eq!(makeups[0].id.0, "mk-racer");
}

#[tokio::test]
async fn slot_disabled_mid_booking_is_a_capacity_conflict() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    h.overlay.race_next_apply(OverlayOp::SetSlotFlags {
        slot: slot("Thu4"),
        flags: SlotFlags {
            disabled: true,
            locked_on: None,
        },
    });

    let err = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "capacity_conflict");
    assert!(h.overlay.peek().makeups.is_empty());
}

#[parameterized(
    well_before = { "2026-02-12 13:59", true },
    inside_margin = { "2026-02-12 14:00", false },
)]
#[test_macro(tokio::test)]
async fn makeup_cancel_window(now: &str, allowed: bool) {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let request = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap()
        .value;

    h.clock.set(at(now));
    let result = h.scheduler.cancel_makeup(&request.id.0).await;
    assert_eq!(result.is_ok(), allowed, "cancel at {now}: {result:?}");
    if let Err(e) = result {
        assert_eq!(e.predicate(), Some("AlreadyStarted"));
    }
}

#[tokio::test]
async fn completed_makeup_cannot_be_cancelled() {
    let h = Harness::new(vec![enrolled("alice", "Tue2")], MONDAY_NOON);
    let request = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap()
        .value;

    h.clock.set(at("2026-02-12 15:00"));
    let err = h.scheduler.cancel_makeup(&request.id.0).await.unwrap_err();
    assert_eq!(
        err,
        ScheduleError::AlreadyTerminal {
            kind: sk_core::RecordKind::Makeup,
            id: request.id.0.clone(),
            status: "completed",
        }
    );
}

/// Roster whose per-slot listing has picked up one more student than the
/// full listing, as an eventually consistent upstream might
#[derive(Clone)]
struct LateJoiner {
    inner: FakeRosterProvider,
    late: RosterAssignment,
}

#[async_trait]
impl RosterProvider for LateJoiner {
    async fn list_assignments(&self, slot: Slot) -> Result<Vec<RosterAssignment>, RosterError> {
        let mut found = self.inner.list_assignments(slot).await?;
        if self.late.slot == slot {
            found.push(self.late.clone());
        }
        Ok(found)
    }

    async fn list_student_assignments(
        &self,
        student: &StudentId,
    ) -> Result<Vec<RosterAssignment>, RosterError> {
        self.inner.list_student_assignments(student).await
    }

    async fn list_all(&self) -> Result<Vec<RosterAssignment>, RosterError> {
        self.inner.list_all().await
    }

    async fn rewrite_assignment_slot(
        &self,
        student: &StudentId,
        old: Slot,
        new: Slot,
    ) -> Result<(), RosterError> {
        self.inner.rewrite_assignment_slot(student, old, new).await
    }
}

#[tokio::test]
async fn overbooking_after_commit_opens_a_conflict() {
    let mut assignments = filled("Thu4", 6);
    assignments.push(enrolled("alice", "Tue2"));
    let roster = LateJoiner {
        inner: FakeRosterProvider::with_assignments(assignments),
        late: enrolled("latecomer", "Thu4"),
    };
    let overlay = FakeOverlayStore::new();
    let scheduler = Scheduler::new(
        SchedulerDeps {
            roster,
            overlay: overlay.clone(),
        },
        SchedulerConfig::default(),
        FakeClock::at(at(MONDAY_NOON)),
        SequentialIdGen::new(),
    );

    let outcome = scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-12", "Thu4"))
        .await
        .unwrap();

    let names: Vec<&str> = outcome.events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["makeup:booked", "capacity:overbooked"]);

    let conflicts = scheduler.list_conflicts().await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].seats_used, 8);
    assert_eq!(conflicts[0].cause, outcome.value.id.0);

    scheduler.resolve_conflict(&conflicts[0].id.0).await.unwrap();
    assert!(scheduler.list_conflicts().await.unwrap().is_empty());
}

/// Alice plus six others on Tue2, and bob on Thu1
fn busy_tuesday() -> Harness {
    let mut roster = filled("Tue2", 6);
    roster.push(enrolled("alice", "Tue2"));
    roster.push(enrolled("bob", "Thu1"));
    Harness::new(roster, MONDAY_NOON)
}

/// Bob takes the seat alice left free on Tue2@02-10
async fn bob_fills_alices_seat(h: &Harness) {
    h.scheduler
        .request_makeup(
            &StudentId::from("bob"),
            occ("2026-02-12", "Thu1"),
            occ("2026-02-10", "Tue2"),
        )
        .await
        .unwrap();
}

async fn assert_tuesday_overbooked(h: &Harness, events: &[Event], cancelled: &str) {
    let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec![cancelled, "capacity:overbooked"]);

    let conflicts = h.scheduler.list_conflicts().await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].occurrence, occ("2026-02-10", "Tue2"));
    assert_eq!(conflicts[0].seats_used, 8);
    assert_eq!(conflicts[0].capacity, 7);
}

#[tokio::test]
async fn cancelled_makeup_returning_to_a_filled_class_opens_a_conflict() {
    let h = busy_tuesday();
    let away = h
        .scheduler
        .request_makeup(&alice(), occ("2026-02-10", "Tue2"), occ("2026-02-11", "Wed3"))
        .await
        .unwrap()
        .value;
    bob_fills_alices_seat(&h).await;

    let outcome = h.scheduler.cancel_makeup(&away.id.0).await.unwrap();
    assert_tuesday_overbooked(&h, &outcome.events, "makeup:cancelled").await;
}

#[tokio::test]
async fn cancelled_absence_returning_to_a_filled_class_opens_a_conflict() {
    let h = busy_tuesday();
    let absence = h
        .scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap()
        .value;
    bob_fills_alices_seat(&h).await;

    let outcome = h.scheduler.cancel_absence(&absence.id.0).await.unwrap();
    assert_tuesday_overbooked(&h, &outcome.events, "absence:cancelled").await;
}

#[tokio::test]
async fn cancelled_holding_returning_to_a_filled_class_opens_a_conflict() {
    let h = busy_tuesday();
    let holding = h
        .scheduler
        .request_holding(&alice(), date("2026-02-10"), date("2026-02-17"))
        .await
        .unwrap()
        .value;
    bob_fills_alices_seat(&h).await;

    let outcome = h.scheduler.cancel_holding(&holding.id.0).await.unwrap();
    // only 02-10 was refilled; 02-17 stays within capacity
    assert_tuesday_overbooked(&h, &outcome.events, "holding:cancelled").await;
}

#[tokio::test]
async fn open_conflicts_are_not_flagged_twice() {
    let h = busy_tuesday();
    let first = h
        .scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap()
        .value;
    bob_fills_alices_seat(&h).await;
    h.scheduler.cancel_absence(&first.id.0).await.unwrap();

    // the class stays overbooked while the first conflict is open
    let second = h
        .scheduler
        .request_absence(&alice(), date("2026-02-10"))
        .await
        .unwrap()
        .value;
    let outcome = h.scheduler.cancel_absence(&second.id.0).await.unwrap();

    let names: Vec<&str> = outcome.events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["absence:cancelled"]);
    assert_eq!(h.scheduler.list_conflicts().await.unwrap().len(), 1);
}

// =============================================================================
// Waitlist
// =============================================================================

fn crowded_thursday() -> Vec<RosterAssignment> {
    let mut roster = filled("Thu4", 7);
    roster.push(enrolled("alice", "Tue2"));
    roster
}

#[tokio::test]
async fn waitlist_round_trip_rewrites_roster() {
    let h = Harness::new(crowded_thursday(), MONDAY_NOON);
    let request = h
        .scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Thu4"))
        .await
        .unwrap()
        .value;
    assert_eq!(request.status, WaitlistStatus::Waiting);

    let err = h.scheduler.accept_waitlist(&request.id.0).await.unwrap_err();
    assert_eq!(err.predicate(), Some("ValidTransition"));

    let mut roster = h.roster.assignments();
    roster.retain(|a| a.student.0 != "Thu4-3");
    h.roster.set_assignments(roster);

    let outcome = h.scheduler.accept_waitlist(&request.id.0).await.unwrap();
    let names: Vec<&str> = outcome.events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["waitlist:notified", "waitlist:accepted"]);
    assert_eq!(outcome.value.status, WaitlistStatus::Accepted);

    let alice_slots: Vec<Slot> = h
        .roster
        .assignments()
        .into_iter()
        .filter(|a| a.student == alice())
        .map(|a| a.slot)
        .collect();
    assert_eq!(alice_slots, vec![slot("Thu4")]);
}

#[tokio::test]
async fn accept_rechecks_roster_capacity() {
    let h = Harness::new(crowded_thursday(), MONDAY_NOON);
    let request = h
        .scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Thu4"))
        .await
        .unwrap()
        .value;

    let mut roster = h.roster.assignments();
    roster.retain(|a| a.student.0 != "Thu4-3");
    h.roster.set_assignments(roster);
    h.scheduler.get_week_view(date("2026-02-09")).await.unwrap();

    h.roster.push(enrolled("walk-in", "Thu4"));
    let err = h.scheduler.accept_waitlist(&request.id.0).await.unwrap_err();

    assert_eq!(err.kind(), "capacity_conflict");
    assert!(h
        .roster
        .assignments()
        .iter()
        .any(|a| a.student == alice() && a.slot == slot("Tue2")));
}

#[tokio::test]
async fn waitlist_rules() {
    let h = Harness::new(crowded_thursday(), MONDAY_NOON);

    let open = h
        .scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Fri5"))
        .await
        .unwrap_err();
    assert_eq!(open.predicate(), Some("WaitlistRequiresFull"));

    let own = h
        .scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Tue2"))
        .await
        .unwrap_err();
    assert_eq!(own.predicate(), Some("NoSelfConflict"));

    let not_mine = h
        .scheduler
        .request_waitlist(&alice(), slot("Wed3"), slot("Thu4"))
        .await
        .unwrap_err();
    assert_eq!(not_mine.predicate(), Some("OwnsCurrent"));

    h.scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Thu4"))
        .await
        .unwrap();
    let twice = h
        .scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Thu4"))
        .await
        .unwrap_err();
    assert_eq!(twice.predicate(), Some("NoDuplicateWaitlist"));
}

#[tokio::test]
async fn waitlist_cancel_is_final() {
    let h = Harness::new(crowded_thursday(), MONDAY_NOON);
    let request = h
        .scheduler
        .request_waitlist(&alice(), slot("Tue2"), slot("Thu4"))
        .await
        .unwrap()
        .value;

    let cancelled = h.scheduler.cancel_waitlist(&request.id.0).await.unwrap();
    assert_eq!(cancelled.value.status, WaitlistStatus::Cancelled);

    let err = h.scheduler.cancel_waitlist(&request.id.0).await.unwrap_err();
    assert!(matches!(err, ScheduleError::AlreadyTerminal { .. }));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let h = Harness::new(vec![], MONDAY_NOON);
    let err = h.scheduler.cancel_makeup("mk-404").await.unwrap_err();
    assert_eq!(
        err,
        ScheduleError::NotFound {
            kind: "makeup".into(),
            id: "mk-404".into()
        }
    );
}
