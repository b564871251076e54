// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized overlay state from WAL replay

use crate::op::{OverlayOp, OverlayRecord, RecordFilter};
use sk_core::{
    AbsenceRecord, ConflictRecord, HoldingRecord, HolidayRecord, MakeupRequest, Occurrence,
    OverlaySnapshot, RecordKind, Slot, SlotFlags, WaitlistRequest,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Materialized overlay built from [`OverlayOp`]s
///
/// Besides the records themselves this tracks a generation counter per
/// occurrence. Makeup writes bump the generation of both the vacated and the
/// destination occurrence; flag writes bump the occurrences whose lock date
/// changed. Disabling or re-enabling a slot bumps a per-slot counter that
/// [`OverlayState::generation`] adds to every occurrence of that slot.
/// Capacity-sensitive commits compare against these counters.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    pub holdings: BTreeMap<String, HoldingRecord>,
    pub absences: BTreeMap<String, AbsenceRecord>,
    pub makeups: BTreeMap<String, MakeupRequest>,
    pub waitlists: BTreeMap<String, WaitlistRequest>,
    pub holidays: BTreeMap<NaiveDate, HolidayRecord>,
    pub conflicts: BTreeMap<String, ConflictRecord>,
    pub flags: BTreeMap<Slot, SlotFlags>,
    pub generations: BTreeMap<Occurrence, u64>,
    pub slot_generations: BTreeMap<Slot, u64>,
}

/// Exact id match first, then a unique prefix (like git commit hashes)
fn lookup<'a, T>(map: &'a BTreeMap<String, T>, id: &str) -> Option<&'a T> {
    if let Some(found) = map.get(id) {
        return Some(found);
    }
    let mut matches = map.iter().filter(|(k, _)| k.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some((_, only)), None) => Some(only),
        _ => None,
    }
}

impl OverlayState {
    /// Rebuild state by applying `ops` in order
    pub fn replay<'a>(ops: impl IntoIterator<Item = &'a OverlayOp>) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    pub fn generation(&self, occurrence: &Occurrence) -> u64 {
        let own = self.generations.get(occurrence).copied().unwrap_or(0);
        own + self.slot_generations.get(&occurrence.slot).copied().unwrap_or(0)
    }

    /// Occurrences whose generation `op` would bump
    pub fn touched_by(&self, op: &OverlayOp) -> Vec<Occurrence> {
        match op {
            OverlayOp::PutMakeup(request) => vec![request.original, request.makeup],
            OverlayOp::SetSlotFlags { slot, flags } => {
                let before = self.flags.get(slot).copied().unwrap_or_default();
                if before.locked_on == flags.locked_on {
                    return Vec::new();
                }
                [before.locked_on, flags.locked_on]
                    .into_iter()
                    .flatten()
                    .map(|date| Occurrence::new(date, *slot))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &OverlayOp) {
        for occurrence in self.touched_by(op) {
            *self.generations.entry(occurrence).or_insert(0) += 1;
        }
        if let OverlayOp::SetSlotFlags { slot, flags } = op {
            let before = self.flags.get(slot).copied().unwrap_or_default();
            if before.disabled != flags.disabled {
                *self.slot_generations.entry(*slot).or_insert(0) += 1;
            }
        }

        match op {
            OverlayOp::PutHolding(record) => {
                self.holdings.insert(record.id.to_string(), record.clone());
            }
            OverlayOp::PutAbsence(record) => {
                self.absences.insert(record.id.to_string(), record.clone());
            }
            OverlayOp::PutMakeup(record) => {
                self.makeups.insert(record.id.to_string(), record.clone());
            }
            OverlayOp::PutWaitlist(record) => {
                self.waitlists.insert(record.id.to_string(), record.clone());
            }
            OverlayOp::PutHoliday(record) => {
                self.holidays.insert(record.date, record.clone());
            }
            OverlayOp::PutConflict(record) => {
                self.conflicts.insert(record.id.to_string(), record.clone());
            }
            OverlayOp::SetSlotFlags { slot, flags } => {
                if *flags == SlotFlags::default() {
                    self.flags.remove(slot);
                } else {
                    self.flags.insert(*slot, *flags);
                }
            }
        }
    }

    /// Copy of everything the calculator needs
    pub fn snapshot(&self) -> OverlaySnapshot {
        let mut waitlists: Vec<WaitlistRequest> = self.waitlists.values().cloned().collect();
        waitlists.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        OverlaySnapshot {
            holdings: self.holdings.values().cloned().collect(),
            absences: self.absences.values().cloned().collect(),
            makeups: self.makeups.values().cloned().collect(),
            waitlists,
            holidays: self.holidays.clone(),
            conflicts: self.conflicts.values().cloned().collect(),
            flags: self.flags.clone(),
            generations: self.generations.clone(),
            slot_generations: self.slot_generations.clone(),
        }
    }

    /// Look up a record by kind and id (or unique id prefix)
    ///
    /// Holidays are keyed by their `YYYY-MM-DD` date.
    pub fn get(&self, kind: RecordKind, id: &str) -> Option<OverlayRecord> {
        match kind {
            RecordKind::Holding => lookup(&self.holdings, id).cloned().map(OverlayRecord::Holding),
            RecordKind::Absence => lookup(&self.absences, id).cloned().map(OverlayRecord::Absence),
            RecordKind::Makeup => lookup(&self.makeups, id).cloned().map(OverlayRecord::Makeup),
            RecordKind::Waitlist => lookup(&self.waitlists, id)
                .cloned()
                .map(OverlayRecord::Waitlist),
            RecordKind::Holiday => id
                .parse::<NaiveDate>()
                .ok()
                .and_then(|d| self.holidays.get(&d))
                .cloned()
                .map(OverlayRecord::Holiday),
            RecordKind::Conflict => lookup(&self.conflicts, id)
                .cloned()
                .map(OverlayRecord::Conflict),
        }
    }

    /// Non-terminal records of one kind that match `filter`
    pub fn list_active(&self, kind: RecordKind, filter: &RecordFilter) -> Vec<OverlayRecord> {
        let records: Vec<OverlayRecord> = match kind {
            RecordKind::Holding => self.holdings.values().cloned().map(OverlayRecord::Holding).collect(),
            RecordKind::Absence => self.absences.values().cloned().map(OverlayRecord::Absence).collect(),
            RecordKind::Makeup => self.makeups.values().cloned().map(OverlayRecord::Makeup).collect(),
            RecordKind::Waitlist => self
                .waitlists
                .values()
                .cloned()
                .map(OverlayRecord::Waitlist)
                .collect(),
            RecordKind::Holiday => self.holidays.values().cloned().map(OverlayRecord::Holiday).collect(),
            RecordKind::Conflict => self
                .conflicts
                .values()
                .cloned()
                .map(OverlayRecord::Conflict)
                .collect(),
        };
        records
            .into_iter()
            .filter(|r| r.is_active() && filter.matches(r))
            .collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
