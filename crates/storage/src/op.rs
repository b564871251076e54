// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overlay write operations and record views

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sk_core::{
    AbsenceRecord, ConflictRecord, HoldingRecord, HolidayRecord, MakeupRequest, RecordKind, Slot,
    SlotFlags, StudentId, WaitlistRequest,
};

/// A single durable change to the overlay
///
/// Records are upserted whole; there is no delete. Terminal records are
/// written like any other state change and stay queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OverlayOp {
    PutHolding(HoldingRecord),
    PutAbsence(AbsenceRecord),
    PutMakeup(MakeupRequest),
    PutWaitlist(WaitlistRequest),
    PutHoliday(HolidayRecord),
    PutConflict(ConflictRecord),
    SetSlotFlags { slot: Slot, flags: SlotFlags },
}

impl OverlayOp {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            OverlayOp::PutHolding(_) => "put_holding",
            OverlayOp::PutAbsence(_) => "put_absence",
            OverlayOp::PutMakeup(_) => "put_makeup",
            OverlayOp::PutWaitlist(_) => "put_waitlist",
            OverlayOp::PutHoliday(_) => "put_holiday",
            OverlayOp::PutConflict(_) => "put_conflict",
            OverlayOp::SetSlotFlags { .. } => "set_slot_flags",
        }
    }

    /// Id of the written record, if the op writes one
    pub fn record_id(&self) -> Option<String> {
        match self {
            OverlayOp::PutHolding(r) => Some(r.id.to_string()),
            OverlayOp::PutAbsence(r) => Some(r.id.to_string()),
            OverlayOp::PutMakeup(r) => Some(r.id.to_string()),
            OverlayOp::PutWaitlist(r) => Some(r.id.to_string()),
            OverlayOp::PutHoliday(r) => Some(r.date.to_string()),
            OverlayOp::PutConflict(r) => Some(r.id.to_string()),
            OverlayOp::SetSlotFlags { .. } => None,
        }
    }

    /// The record this op writes, as a lookup would return it
    pub fn record(&self) -> Option<OverlayRecord> {
        match self {
            OverlayOp::PutHolding(r) => Some(OverlayRecord::Holding(r.clone())),
            OverlayOp::PutAbsence(r) => Some(OverlayRecord::Absence(r.clone())),
            OverlayOp::PutMakeup(r) => Some(OverlayRecord::Makeup(r.clone())),
            OverlayOp::PutWaitlist(r) => Some(OverlayRecord::Waitlist(r.clone())),
            OverlayOp::PutHoliday(r) => Some(OverlayRecord::Holiday(r.clone())),
            OverlayOp::PutConflict(r) => Some(OverlayRecord::Conflict(r.clone())),
            OverlayOp::SetSlotFlags { .. } => None,
        }
    }
}

/// Any overlay record, as returned by kind-generic lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayRecord {
    Holding(HoldingRecord),
    Absence(AbsenceRecord),
    Makeup(MakeupRequest),
    Waitlist(WaitlistRequest),
    Holiday(HolidayRecord),
    Conflict(ConflictRecord),
}

impl OverlayRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            OverlayRecord::Holding(_) => RecordKind::Holding,
            OverlayRecord::Absence(_) => RecordKind::Absence,
            OverlayRecord::Makeup(_) => RecordKind::Makeup,
            OverlayRecord::Waitlist(_) => RecordKind::Waitlist,
            OverlayRecord::Holiday(_) => RecordKind::Holiday,
            OverlayRecord::Conflict(_) => RecordKind::Conflict,
        }
    }

    /// Not yet in a terminal state
    pub fn is_active(&self) -> bool {
        match self {
            OverlayRecord::Holding(r) => r.is_active(),
            OverlayRecord::Absence(r) => r.is_active(),
            OverlayRecord::Makeup(r) => r.is_active(),
            OverlayRecord::Waitlist(r) => r.status.is_open(),
            OverlayRecord::Holiday(_) => true,
            OverlayRecord::Conflict(r) => r.is_open(),
        }
    }

    pub fn student(&self) -> Option<&StudentId> {
        match self {
            OverlayRecord::Holding(r) => Some(&r.student),
            OverlayRecord::Absence(r) => Some(&r.student),
            OverlayRecord::Makeup(r) => Some(&r.student),
            OverlayRecord::Waitlist(r) => Some(&r.student),
            OverlayRecord::Holiday(_) | OverlayRecord::Conflict(_) => None,
        }
    }

    /// Whether the record touches `slot`
    fn involves_slot(&self, slot: Slot) -> bool {
        match self {
            OverlayRecord::Makeup(r) => r.original.slot == slot || r.makeup.slot == slot,
            OverlayRecord::Waitlist(r) => r.current == slot || r.desired == slot,
            OverlayRecord::Conflict(r) => r.occurrence.slot == slot,
            OverlayRecord::Holding(_) | OverlayRecord::Absence(_) | OverlayRecord::Holiday(_) => {
                false
            }
        }
    }

    /// Whether the record applies on `date`
    fn involves_date(&self, date: NaiveDate) -> bool {
        match self {
            OverlayRecord::Holding(r) => r.covers(date),
            OverlayRecord::Absence(r) => r.date == date,
            OverlayRecord::Makeup(r) => r.original.date == date || r.makeup.date == date,
            OverlayRecord::Holiday(r) => r.date == date,
            OverlayRecord::Conflict(r) => r.occurrence.date == date,
            OverlayRecord::Waitlist(_) => false,
        }
    }
}

/// Narrowing for active-record listings; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub student: Option<StudentId>,
    pub slot: Option<Slot>,
    pub date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn student(student: impl Into<StudentId>) -> Self {
        Self {
            student: Some(student.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &OverlayRecord) -> bool {
        if let Some(student) = &self.student {
            if record.student() != Some(student) {
                return false;
            }
        }
        if let Some(slot) = self.slot {
            if !record.involves_slot(slot) {
                return false;
            }
        }
        if let Some(date) = self.date {
            if !record.involves_date(date) {
                return false;
            }
        }
        true
    }
}
