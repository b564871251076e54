// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sk-core: pure scheduling domain for seatkeeper
//!
//! This crate provides:
//! - Slots, occurrences and class-week calendar math
//! - Overlay records (holding, absence, makeup, waitlist) as state machines
//! - The occupancy calculator and admission policy
//! - Compute-on-read sweeps
//! - Configuration, clock and id generation seams

pub mod admission;
pub mod agreed;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod event;
pub mod id;
pub mod occupancy;
pub mod overlay;
pub mod record;
pub mod roster;
pub mod slot;
pub mod sweep;

pub use admission::{AdmissionPolicy, PolicyViolation};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, SchedulerConfig};
pub use event::Event;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use occupancy::{
    ClassStatus, DisplacedReason, HoldingExtension, OccupancyResult, RosterOccupancy,
    ScheduleView, StudentClass, StudentClassKind, WeekView,
};
pub use overlay::OverlaySnapshot;
pub use record::{
    AbsenceId, AbsenceRecord, AbsenceStatus, ConflictId, ConflictRecord, HoldingId, HoldingRecord,
    HoldingStatus, HolidayRecord, MakeupId, MakeupRequest, MakeupStatus, RecordKind, SlotFlags,
    TransitionError, WaitlistId, WaitlistRequest, WaitlistStatus,
};
pub use roster::{RosterAssignment, StudentId};
pub use slot::{ClassDay, Occurrence, Period, Slot, SlotParseError};
pub use sweep::SweepPlan;
