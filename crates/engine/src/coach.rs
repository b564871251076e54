// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coach operations: slot flags, holidays and conflict resolution

use crate::error::ScheduleError;
use crate::scheduler::{Outcome, Scheduler};
use chrono::NaiveDate;
use sk_adapters::{OverlayStore, RosterProvider};
use sk_core::{
    Clock, ConflictRecord, Event, HolidayRecord, IdGen, Occurrence, RecordKind, Slot, SlotFlags,
};
use sk_storage::{OverlayOp, OverlayRecord};

impl<R, O, C, I> Scheduler<R, O, C, I>
where
    R: RosterProvider,
    O: OverlayStore,
    C: Clock,
    I: IdGen,
{
    /// Cancel or restore a slot outright
    pub async fn toggle_slot_disabled(&self, slot: Slot) -> Result<Outcome<SlotFlags>, ScheduleError> {
        let loaded = self.load().await?;
        loaded.policy(&self.config).known_slot(slot)?;

        let flags = loaded.overlay.flags(slot).toggled_disabled();
        let events = vec![if flags.disabled {
            Event::SlotDisabled { slot }
        } else {
            Event::SlotEnabled { slot }
        }];
        self.commit(OverlayOp::SetSlotFlags { slot, flags }, &events)
            .await?;
        Ok(loaded.outcome(flags, events))
    }

    /// Lock or unlock one occurrence of a slot against makeups
    ///
    /// A slot holds at most one lock; locking a new date moves it.
    pub async fn toggle_slot_locked(
        &self,
        slot: Slot,
        date: NaiveDate,
    ) -> Result<Outcome<SlotFlags>, ScheduleError> {
        let loaded = self.load().await?;
        let policy = loaded.policy(&self.config);
        policy.known_slot(slot)?;
        policy.date_matches_slot(&Occurrence::new(date, slot))?;

        let flags = loaded
            .overlay
            .flags(slot)
            .toggled_lock(date, loaded.now.date());
        let events = vec![match flags.locked_on {
            Some(date) => Event::SlotLocked { slot, date },
            None => Event::SlotUnlocked { slot },
        }];
        self.commit(OverlayOp::SetSlotFlags { slot, flags }, &events)
            .await?;
        Ok(loaded.outcome(flags, events))
    }

    /// Close the studio on `date`
    pub async fn add_holiday(
        &self,
        date: NaiveDate,
        reason: &str,
    ) -> Result<Outcome<HolidayRecord>, ScheduleError> {
        let loaded = self.load().await?;
        let record = HolidayRecord::new(date, reason);
        let events = vec![Event::HolidayAdded {
            date,
            reason: reason.to_string(),
        }];
        self.commit(OverlayOp::PutHoliday(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }

    /// Mark a capacity conflict as handled
    pub async fn resolve_conflict(&self, id: &str) -> Result<Outcome<ConflictRecord>, ScheduleError> {
        let loaded = self.load().await?;
        let conflict = match self.fetch(RecordKind::Conflict, id).await? {
            OverlayRecord::Conflict(record) => record,
            _ => return Err(ScheduleError::not_found(RecordKind::Conflict, id)),
        };
        if !conflict.is_open() {
            return Err(ScheduleError::AlreadyTerminal {
                kind: RecordKind::Conflict,
                id: conflict.id.to_string(),
                status: "resolved",
            });
        }

        let record = ConflictRecord {
            resolved_at: Some(loaded.now),
            ..conflict
        };
        let events = vec![Event::ConflictResolved {
            id: record.id.to_string(),
        }];
        self.commit(OverlayOp::PutConflict(record.clone()), &events)
            .await?;
        Ok(loaded.outcome(record, events))
    }
}

#[cfg(test)]
#[path = "coach_tests.rs"]
mod tests;
