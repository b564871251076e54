// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time view of the overlay records
//!
//! The calculator and admission policy only ever read an
//! [`OverlaySnapshot`]; they never reach into the store themselves.

use crate::record::{
    AbsenceRecord, ConflictRecord, HoldingRecord, HolidayRecord, MakeupRequest, SlotFlags,
    WaitlistRequest,
};
use crate::roster::StudentId;
use crate::slot::{Occurrence, Slot};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// All overlay state needed to reconcile attendance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySnapshot {
    pub holdings: Vec<HoldingRecord>,
    pub absences: Vec<AbsenceRecord>,
    pub makeups: Vec<MakeupRequest>,
    /// Oldest first
    pub waitlists: Vec<WaitlistRequest>,
    pub holidays: BTreeMap<NaiveDate, HolidayRecord>,
    pub conflicts: Vec<ConflictRecord>,
    pub flags: BTreeMap<Slot, SlotFlags>,
    /// Per-occurrence write generations for optimistic commits
    pub generations: BTreeMap<Occurrence, u64>,
    /// Bumped when a slot is disabled or re-enabled; counts toward every
    /// occurrence of the slot
    pub slot_generations: BTreeMap<Slot, u64>,
}

impl OverlaySnapshot {
    pub fn flags(&self, slot: Slot) -> SlotFlags {
        self.flags.get(&slot).copied().unwrap_or_default()
    }

    pub fn generation(&self, occurrence: &Occurrence) -> u64 {
        let own = self.generations.get(occurrence).copied().unwrap_or(0);
        own + self.slot_generations.get(&occurrence.slot).copied().unwrap_or(0)
    }

    pub fn holiday(&self, date: NaiveDate) -> Option<&HolidayRecord> {
        self.holidays.get(&date)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// The student's active holding, if any covers `date`
    pub fn holding_covering(&self, student: &StudentId, date: NaiveDate) -> Option<&HoldingRecord> {
        self.holdings
            .iter()
            .find(|h| h.is_active() && &h.student == student && h.covers(date))
    }

    pub fn active_holdings_of<'a>(
        &'a self,
        student: &'a StudentId,
    ) -> impl Iterator<Item = &'a HoldingRecord> + 'a {
        self.holdings
            .iter()
            .filter(move |h| h.is_active() && &h.student == student)
    }

    pub fn absence_on(&self, student: &StudentId, date: NaiveDate) -> Option<&AbsenceRecord> {
        self.absences
            .iter()
            .find(|a| a.is_active() && &a.student == student && a.date == date)
    }

    pub fn active_makeups_of<'a>(
        &'a self,
        student: &'a StudentId,
    ) -> impl Iterator<Item = &'a MakeupRequest> + 'a {
        self.makeups
            .iter()
            .filter(move |m| m.is_active() && &m.student == student)
    }

    /// Makeup (active or completed) vacating `occurrence` for the student
    pub fn makeup_out(&self, student: &StudentId, occurrence: &Occurrence) -> Option<&MakeupRequest> {
        self.makeups
            .iter()
            .find(|m| m.holds_seat() && &m.student == student && &m.original == occurrence)
    }

    /// Makeups (active or completed) landing in `occurrence`
    pub fn makeups_into<'a>(
        &'a self,
        occurrence: &'a Occurrence,
    ) -> impl Iterator<Item = &'a MakeupRequest> + 'a {
        self.makeups
            .iter()
            .filter(move |m| m.holds_seat() && &m.makeup == occurrence)
    }

    pub fn open_waitlists_of<'a>(
        &'a self,
        student: &'a StudentId,
    ) -> impl Iterator<Item = &'a WaitlistRequest> + 'a {
        self.waitlists
            .iter()
            .filter(move |w| w.status.is_open() && &w.student == student)
    }

    pub fn open_conflicts(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.conflicts.iter().filter(|c| c.is_open())
    }
}
