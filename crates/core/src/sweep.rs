// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute-on-read sweeps
//!
//! Two time-driven transitions happen lazily whenever the schedule is read:
//! makeups whose destination class has started become `completed`, and
//! waiting waitlist requests are notified when roster seats free up. Planning
//! is pure; the caller writes the planned records back.

use crate::config::SchedulerConfig;
use crate::event::Event;
use crate::occupancy::ScheduleView;
use crate::overlay::OverlaySnapshot;
use crate::record::{MakeupInput, MakeupRequest, WaitlistInput, WaitlistRequest, WaitlistStatus};
use crate::slot::Slot;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Records a sweep wants written, with the events they produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepPlan {
    pub completed: Vec<MakeupRequest>,
    pub notified: Vec<WaitlistRequest>,
    pub events: Vec<Event>,
}

impl SweepPlan {
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.notified.is_empty()
    }
}

/// Active makeups whose destination class has started by `now`
pub fn plan_completions(
    overlay: &OverlaySnapshot,
    config: &SchedulerConfig,
    now: NaiveDateTime,
) -> Vec<(MakeupRequest, Vec<Event>)> {
    overlay
        .makeups
        .iter()
        .filter(|m| m.is_active())
        .filter(|m| config.starts_at(&m.makeup).is_some_and(|start| start <= now))
        .filter_map(|m| m.transition(MakeupInput::Complete, now).ok())
        .collect()
}

/// Waiting requests to notify, oldest first per desired slot
///
/// Each slot notifies at most as many requests as it has free roster seats,
/// less the requests already holding an unanswered offer.
pub fn plan_notifications(
    view: &ScheduleView<'_>,
    now: NaiveDateTime,
) -> Vec<(WaitlistRequest, Vec<Event>)> {
    let mut by_slot: BTreeMap<Slot, Vec<&WaitlistRequest>> = BTreeMap::new();
    for request in &view.overlay.waitlists {
        if request.status.is_open() {
            by_slot.entry(request.desired).or_default().push(request);
        }
    }

    let mut planned = Vec::new();
    for (slot, mut queue) in by_slot {
        queue.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let offered = queue
            .iter()
            .filter(|w| w.status == WaitlistStatus::Notified)
            .count();
        let free = view.roster_occupancy(slot).seats_available as usize;
        let budget = free.saturating_sub(offered);
        planned.extend(
            queue
                .into_iter()
                .filter(|w| w.status == WaitlistStatus::Waiting)
                .take(budget)
                .filter_map(|w| w.transition(WaitlistInput::Notify, now).ok()),
        );
    }
    planned
}

/// Both sweeps against one view
pub fn plan(view: &ScheduleView<'_>, now: NaiveDateTime) -> SweepPlan {
    let mut sweep = SweepPlan::default();
    for (record, events) in plan_completions(view.overlay, view.config, now) {
        sweep.completed.push(record);
        sweep.events.extend(events);
    }
    for (record, events) in plan_notifications(view, now) {
        sweep.notified.push(record);
        sweep.events.extend(events);
    }
    sweep
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
