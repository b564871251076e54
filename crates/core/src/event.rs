// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events emitted by record transitions

use crate::slot::{Occurrence, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Events emitted by state machines and coach actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    // Holding events
    HoldingRequested {
        id: String,
        student: String,
        start: NaiveDate,
        end: NaiveDate,
        suppressed: u32,
    },
    HoldingCancelled {
        id: String,
        student: String,
    },

    // Absence events
    AbsenceRecorded {
        id: String,
        student: String,
        date: NaiveDate,
    },
    AbsenceCancelled {
        id: String,
        student: String,
        date: NaiveDate,
    },

    // Makeup events
    MakeupBooked {
        id: String,
        student: String,
        original: Occurrence,
        makeup: Occurrence,
    },
    MakeupCompleted {
        id: String,
        student: String,
    },
    MakeupCancelled {
        id: String,
        student: String,
    },

    // Waitlist events
    WaitlistJoined {
        id: String,
        student: String,
        current: Slot,
        desired: Slot,
    },
    WaitlistNotified {
        id: String,
        student: String,
        desired: Slot,
    },
    WaitlistAccepted {
        id: String,
        student: String,
        current: Slot,
        desired: Slot,
    },
    WaitlistCancelled {
        id: String,
        student: String,
    },

    // Coach events
    HolidayAdded {
        date: NaiveDate,
        reason: String,
    },
    SlotDisabled {
        slot: Slot,
    },
    SlotEnabled {
        slot: Slot,
    },
    SlotLocked {
        slot: Slot,
        date: NaiveDate,
    },
    SlotUnlocked {
        slot: Slot,
    },
    CapacityOverbooked {
        conflict_id: String,
        occurrence: Occurrence,
        seats_used: u32,
        capacity: u32,
    },
    ConflictResolved {
        id: String,
    },
}

impl Event {
    /// Event name in `group:action` form
    pub fn name(&self) -> &'static str {
        match self {
            Event::HoldingRequested { .. } => "holding:requested",
            Event::HoldingCancelled { .. } => "holding:cancelled",
            Event::AbsenceRecorded { .. } => "absence:recorded",
            Event::AbsenceCancelled { .. } => "absence:cancelled",
            Event::MakeupBooked { .. } => "makeup:booked",
            Event::MakeupCompleted { .. } => "makeup:completed",
            Event::MakeupCancelled { .. } => "makeup:cancelled",
            Event::WaitlistJoined { .. } => "waitlist:joined",
            Event::WaitlistNotified { .. } => "waitlist:notified",
            Event::WaitlistAccepted { .. } => "waitlist:accepted",
            Event::WaitlistCancelled { .. } => "waitlist:cancelled",
            Event::HolidayAdded { .. } => "holiday:added",
            Event::SlotDisabled { .. } => "slot:disabled",
            Event::SlotEnabled { .. } => "slot:enabled",
            Event::SlotLocked { .. } => "slot:locked",
            Event::SlotUnlocked { .. } => "slot:unlocked",
            Event::CapacityOverbooked { .. } => "capacity:overbooked",
            Event::ConflictResolved { .. } => "conflict:resolved",
        }
    }

    /// Student the event concerns, if any
    pub fn student(&self) -> Option<&str> {
        match self {
            Event::HoldingRequested { student, .. }
            | Event::HoldingCancelled { student, .. }
            | Event::AbsenceRecorded { student, .. }
            | Event::AbsenceCancelled { student, .. }
            | Event::MakeupBooked { student, .. }
            | Event::MakeupCompleted { student, .. }
            | Event::MakeupCancelled { student, .. }
            | Event::WaitlistJoined { student, .. }
            | Event::WaitlistNotified { student, .. }
            | Event::WaitlistAccepted { student, .. }
            | Event::WaitlistCancelled { student, .. } => Some(student),
            _ => None,
        }
    }
}
