// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler facade over the roster and overlay

use crate::error::ScheduleError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sk_adapters::{OverlayStore, RosterProvider};
use sk_core::sweep;
use sk_core::{
    AdmissionPolicy, Clock, ConflictRecord, Event, HoldingExtension, HoldingRecord, IdGen,
    OccupancyResult, OverlaySnapshot, RecordKind, RosterAssignment, ScheduleView,
    SchedulerConfig, Slot, StudentClass, StudentId, WeekView,
};
use sk_storage::{OverlayOp, OverlayRecord};

/// Collaborators the scheduler reads and writes through
pub struct SchedulerDeps<R, O> {
    pub roster: R,
    pub overlay: O,
}

/// Result of a mutating call, with every event it caused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    /// Sweep events first, then the request's own
    pub events: Vec<Event>,
}

/// Active holding and the enrollment extension it earns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionReport {
    pub holding: HoldingRecord,
    #[serde(flatten)]
    pub extension: HoldingExtension,
}

/// Roster and overlay read at one instant, after sweeping
pub(crate) struct Loaded {
    pub roster: Vec<RosterAssignment>,
    pub overlay: OverlaySnapshot,
    pub now: NaiveDateTime,
    /// Events from the sweep that ran during the load
    pub swept: Vec<Event>,
}

impl Loaded {
    pub fn view<'a>(&'a self, config: &'a SchedulerConfig) -> ScheduleView<'a> {
        ScheduleView::new(&self.roster, &self.overlay, config, self.now.date())
    }

    pub fn policy<'a>(&'a self, config: &'a SchedulerConfig) -> AdmissionPolicy<'a> {
        AdmissionPolicy::new(self.view(config), self.now)
    }

    /// Wrap a request's result together with the sweep events
    pub fn outcome<T>(self, value: T, events: Vec<Event>) -> Outcome<T> {
        let mut all = self.swept;
        all.extend(events);
        Outcome { value, events: all }
    }
}

/// Log each event at info
pub(crate) fn log_events(events: &[Event]) {
    for event in events {
        tracing::info!(
            event = event.name(),
            student = event.student().unwrap_or("-"),
            ?event,
            "transition"
        );
    }
}

/// Computes occupancy and runs request lifecycles
///
/// Nothing runs in the background: time-driven transitions are swept at the
/// start of every call.
pub struct Scheduler<R, O, C: Clock, I: IdGen> {
    pub(crate) roster: R,
    pub(crate) overlay: O,
    pub(crate) clock: C,
    pub(crate) id_gen: I,
    pub(crate) config: SchedulerConfig,
}

impl<R, O, C, I> Scheduler<R, O, C, I>
where
    R: RosterProvider,
    O: OverlayStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(deps: SchedulerDeps<R, O>, config: SchedulerConfig, clock: C, id_gen: I) -> Self {
        Self {
            roster: deps.roster,
            overlay: deps.overlay,
            clock,
            id_gen,
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current local time as the scheduler sees it
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Read everything and apply due sweep transitions
    pub(crate) async fn load(&self) -> Result<Loaded, ScheduleError> {
        let now = self.clock.now();
        let roster = self.roster.list_all().await?;
        let overlay = self.overlay.snapshot().await?;

        let plan = {
            let view = ScheduleView::new(&roster, &overlay, &self.config, now.date());
            sweep::plan(&view, now)
        };
        if plan.is_empty() {
            return Ok(Loaded {
                roster,
                overlay,
                now,
                swept: Vec::new(),
            });
        }

        for record in &plan.completed {
            self.overlay
                .apply(OverlayOp::PutMakeup(record.clone()), None)
                .await?;
        }
        for record in &plan.notified {
            self.overlay
                .apply(OverlayOp::PutWaitlist(record.clone()), None)
                .await?;
        }
        tracing::debug!(
            completed = plan.completed.len(),
            notified = plan.notified.len(),
            "sweep applied"
        );
        log_events(&plan.events);

        Ok(Loaded {
            roster,
            overlay: self.overlay.snapshot().await?,
            now,
            swept: plan.events,
        })
    }

    /// Write `op` and log the events it stands for
    pub(crate) async fn commit(&self, op: OverlayOp, events: &[Event]) -> Result<(), ScheduleError> {
        self.overlay.apply(op, None).await?;
        log_events(events);
        Ok(())
    }

    pub(crate) async fn fetch(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, ScheduleError> {
        Ok(self.overlay.get(kind, id).await?)
    }

    /// Occupancy of every slot in the week containing `date`
    pub async fn get_week_view(&self, date: NaiveDate) -> Result<WeekView, ScheduleError> {
        let loaded = self.load().await?;
        Ok(loaded.view(&self.config).week(date))
    }

    /// Who attends `slot` on `date`
    pub async fn get_occupancy(
        &self,
        slot: Slot,
        date: NaiveDate,
    ) -> Result<OccupancyResult, ScheduleError> {
        let loaded = self.load().await?;
        loaded.policy(&self.config).known_slot(slot)?;
        Ok(loaded.view(&self.config).occupancy(slot, date))
    }

    /// The student's own classes in the week containing `date`
    pub async fn student_week(
        &self,
        student: &StudentId,
        date: NaiveDate,
    ) -> Result<Vec<StudentClass>, ScheduleError> {
        let loaded = self.load().await?;
        Ok(loaded.view(&self.config).student_week(student, date))
    }

    /// Enrollment extension earned by the student's latest active holding
    pub async fn holding_extension(
        &self,
        student: &StudentId,
    ) -> Result<ExtensionReport, ScheduleError> {
        let loaded = self.load().await?;
        let holding = loaded
            .overlay
            .active_holdings_of(student)
            .max_by_key(|h| h.start)
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound {
                kind: RecordKind::Holding.to_string(),
                id: student.to_string(),
            })?;
        let extension = loaded.view(&self.config).holding_extension(&holding);
        Ok(ExtensionReport { holding, extension })
    }

    /// Unresolved capacity conflicts
    pub async fn list_conflicts(&self) -> Result<Vec<ConflictRecord>, ScheduleError> {
        let loaded = self.load().await?;
        Ok(loaded.overlay.open_conflicts().cloned().collect())
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
