// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Student request lifecycles: holding, absence, makeup, waitlist

use crate::error::ScheduleError;
use crate::scheduler::{log_events, Outcome, Scheduler};
use chrono::NaiveDate;
use sk_adapters::{CommitGuard, OverlayStore, RosterProvider};
use sk_core::admission::roster_capacity_ok;
use sk_core::record::{AbsenceInput, HoldingInput, MakeupInput, WaitlistInput};
use sk_core::{
    AbsenceRecord, Clock, ConflictRecord, Event, HoldingRecord, IdGen, MakeupRequest, Occurrence,
    RecordKind, Slot, StudentId, WaitlistRequest,
};
use sk_storage::{OverlayOp, OverlayRecord};

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl<R, O, C, I> Scheduler<R, O, C, I>
where
    R: RosterProvider,
    O: OverlayStore,
    C: Clock,
    I: IdGen,
{
    async fn holding(&self, id: &str) -> Result<HoldingRecord, ScheduleError> {
        match self.fetch(RecordKind::Holding, id).await? {
            OverlayRecord::Holding(record) => Ok(record),
            _ => Err(ScheduleError::not_found(RecordKind::Holding, id)),
        }
    }

    async fn absence(&self, id: &str) -> Result<AbsenceRecord, ScheduleError> {
        match self.fetch(RecordKind::Absence, id).await? {
            OverlayRecord::Absence(record) => Ok(record),
            _ => Err(ScheduleError::not_found(RecordKind::Absence, id)),
        }
    }

    async fn makeup(&self, id: &str) -> Result<MakeupRequest, ScheduleError> {
        match self.fetch(RecordKind::Makeup, id).await? {
            OverlayRecord::Makeup(record) => Ok(record),
            _ => Err(ScheduleError::not_found(RecordKind::Makeup, id)),
        }
    }

    async fn waitlist(&self, id: &str) -> Result<WaitlistRequest, ScheduleError> {
        match self.fetch(RecordKind::Waitlist, id).await? {
            OverlayRecord::Waitlist(record) => Ok(record),
            _ => Err(ScheduleError::not_found(RecordKind::Waitlist, id)),
        }
    }

    /// Suspend all of a student's classes over `[start, end]`
    pub async fn request_holding(
        &self,
        student: &StudentId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Outcome<HoldingRecord>, ScheduleError> {
        let loaded = self.load().await?;
        let suppressed = loaded
            .policy(&self.config)
            .check_holding(student, start, end)?;

        let id = self.id_gen.next(RecordKind::Holding);
        let record = HoldingRecord::new(id, student.clone(), start, end, loaded.now);
        let events = vec![Event::HoldingRequested {
            id: record.id.to_string(),
            student: student.to_string(),
            start,
            end,
            suppressed: count(suppressed.len()),
        }];
        self.commit(OverlayOp::PutHolding(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }

    /// Cancel a holding before its first suppressed class closes
    pub async fn cancel_holding(&self, id: &str) -> Result<Outcome<HoldingRecord>, ScheduleError> {
        let loaded = self.load().await?;
        let holding = self.holding(id).await?;
        let (record, mut events) = holding.transition(HoldingInput::Cancel, loaded.now)?;

        let returning: Vec<Occurrence> = loaded
            .view(&self.config)
            .occurrences_of(&holding.student, holding.start, holding.end)
            .into_iter()
            .filter(|o| !loaded.overlay.is_holiday(o.date))
            .collect();
        if let Some(first) = returning.first() {
            loaded.policy(&self.config).not_started(
                &format!("holding {}", holding.id),
                first,
                self.config.margins.holding_select,
            )?;
        }

        self.commit(OverlayOp::PutHolding(record.clone()), &events)
            .await?;
        for occurrence in returning.iter().filter(|o| o.date >= loaded.now.date()) {
            events.extend(self.detect_overbooking(occurrence, &record.id.0).await?);
        }
        Ok(loaded.outcome(record, events))
    }

    /// Mark the student absent from their class on `date`
    pub async fn request_absence(
        &self,
        student: &StudentId,
        date: NaiveDate,
    ) -> Result<Outcome<AbsenceRecord>, ScheduleError> {
        let loaded = self.load().await?;
        loaded.policy(&self.config).check_absence(student, date)?;

        let id = self.id_gen.next(RecordKind::Absence);
        let record = AbsenceRecord::new(id, student.clone(), date, loaded.now);
        let events = vec![Event::AbsenceRecorded {
            id: record.id.to_string(),
            student: student.to_string(),
            date,
        }];
        self.commit(OverlayOp::PutAbsence(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }

    /// Withdraw an absence before the class starts
    pub async fn cancel_absence(&self, id: &str) -> Result<Outcome<AbsenceRecord>, ScheduleError> {
        let loaded = self.load().await?;
        let absence = self.absence(id).await?;
        let (record, mut events) = absence.transition(AbsenceInput::Cancel, loaded.now)?;

        let class = loaded
            .view(&self.config)
            .occurrences_of(&absence.student, absence.date, absence.date)
            .into_iter()
            .next();
        if let Some(class) = &class {
            loaded.policy(&self.config).not_started(
                &format!("absence {}", absence.id),
                class,
                self.config.margins.absence_cancel,
            )?;
        }

        self.commit(OverlayOp::PutAbsence(record.clone()), &events)
            .await?;
        if let Some(class) = &class {
            events.extend(self.detect_overbooking(class, &record.id.0).await?);
        }
        Ok(loaded.outcome(record, events))
    }

    /// Move one class of the student's to another occurrence
    ///
    /// The write is guarded by the generations of both occurrences as read
    /// during validation, so a concurrent booking fails with
    /// `CapacityConflict` instead of overbooking.
    pub async fn request_makeup(
        &self,
        student: &StudentId,
        original: Occurrence,
        makeup: Occurrence,
    ) -> Result<Outcome<MakeupRequest>, ScheduleError> {
        let loaded = self.load().await?;
        loaded
            .policy(&self.config)
            .check_makeup(student, &original, &makeup)?;

        let guard = CommitGuard::pinned(&loaded.overlay, &[original, makeup]);
        let id = self.id_gen.next(RecordKind::Makeup);
        let record = MakeupRequest::new(id, student.clone(), original, makeup, loaded.now);
        self.overlay
            .apply(OverlayOp::PutMakeup(record.clone()), Some(guard))
            .await?;

        let mut events = vec![Event::MakeupBooked {
            id: record.id.to_string(),
            student: student.to_string(),
            original,
            makeup,
        }];
        log_events(&events);
        events.extend(self.detect_overbooking(&makeup, &record.id.0).await?);
        Ok(loaded.outcome(record, events))
    }

    /// Re-read `occurrence` after a commit and record any overshoot
    ///
    /// An occurrence that already has an open conflict is not flagged twice.
    async fn detect_overbooking(
        &self,
        occurrence: &Occurrence,
        cause: &str,
    ) -> Result<Vec<Event>, ScheduleError> {
        let now = self.clock.now();
        let roster = self.roster.list_assignments(occurrence.slot).await?;
        let overlay = self.overlay.snapshot().await?;
        let result = sk_core::ScheduleView::new(&roster, &overlay, &self.config, now.date())
            .occupancy(occurrence.slot, occurrence.date);
        if !result.is_overbooked() {
            return Ok(Vec::new());
        }
        if overlay
            .open_conflicts()
            .any(|c| c.occurrence == *occurrence)
        {
            return Ok(Vec::new());
        }

        let conflict = ConflictRecord {
            id: self.id_gen.next(RecordKind::Conflict).into(),
            occurrence: *occurrence,
            seats_used: result.seats_used,
            capacity: result.capacity,
            cause: cause.to_string(),
            detected_at: now,
            resolved_at: None,
        };
        tracing::warn!(
            %occurrence,
            seats_used = result.seats_used,
            capacity = result.capacity,
            cause,
            "occurrence overbooked"
        );
        let events = vec![Event::CapacityOverbooked {
            conflict_id: conflict.id.to_string(),
            occurrence: *occurrence,
            seats_used: result.seats_used,
            capacity: result.capacity,
        }];
        self.commit(OverlayOp::PutConflict(conflict), &events)
            .await?;
        Ok(events)
    }

    /// Withdraw a makeup before the destination class gets close
    pub async fn cancel_makeup(&self, id: &str) -> Result<Outcome<MakeupRequest>, ScheduleError> {
        let loaded = self.load().await?;
        let request = self.makeup(id).await?;
        let (record, mut events) = request.transition(MakeupInput::Cancel, loaded.now)?;
        loaded.policy(&self.config).not_started(
            &format!("makeup {}", request.id),
            &request.makeup,
            self.config.margins.makeup_cancel,
        )?;

        self.commit(OverlayOp::PutMakeup(record.clone()), &events)
            .await?;
        // the student is back in the original class, which may have filled
        events.extend(self.detect_overbooking(&request.original, &record.id.0).await?);
        Ok(loaded.outcome(record, events))
    }

    /// Queue for a permanent move into a full slot
    pub async fn request_waitlist(
        &self,
        student: &StudentId,
        current: Slot,
        desired: Slot,
    ) -> Result<Outcome<WaitlistRequest>, ScheduleError> {
        let loaded = self.load().await?;
        loaded
            .policy(&self.config)
            .check_waitlist(student, current, desired)?;

        let id = self.id_gen.next(RecordKind::Waitlist);
        let record = WaitlistRequest::new(id, student.clone(), current, desired, loaded.now);
        let events = vec![Event::WaitlistJoined {
            id: record.id.to_string(),
            student: student.to_string(),
            current,
            desired,
        }];
        self.commit(OverlayOp::PutWaitlist(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }

    /// Take a notified seat: rewrite the roster, then close the request
    pub async fn accept_waitlist(
        &self,
        id: &str,
    ) -> Result<Outcome<WaitlistRequest>, ScheduleError> {
        let loaded = self.load().await?;
        let request = self.waitlist(id).await?;
        let (record, events) = request.transition(WaitlistInput::Accept, loaded.now)?;

        let seats = loaded
            .view(&self.config)
            .roster_occupancy(request.desired);
        roster_capacity_ok(&seats).map_err(|v| ScheduleError::CapacityConflict {
            target: request.desired.to_string(),
            detail: v.to_string(),
        })?;

        self.roster
            .rewrite_assignment_slot(&request.student, request.current, request.desired)
            .await?;
        self.commit(OverlayOp::PutWaitlist(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }

    /// Leave the waitlist (waiting or notified only)
    pub async fn cancel_waitlist(
        &self,
        id: &str,
    ) -> Result<Outcome<WaitlistRequest>, ScheduleError> {
        let loaded = self.load().await?;
        let request = self.waitlist(id).await?;
        let (record, events) = request.transition(WaitlistInput::Cancel, loaded.now)?;
        self.commit(OverlayOp::PutWaitlist(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
