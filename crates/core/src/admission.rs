// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission policy
//!
//! Stateless predicates over a [`ScheduleView`]. Each failure is a distinct
//! [`PolicyViolation`] carrying the predicate name, so callers can surface
//! exactly which rule rejected a request.

use crate::config::{to_delta, SchedulerConfig};
use crate::occupancy::{OccupancyResult, RosterOccupancy, ScheduleView};
use crate::roster::{assignments_of, cycle_start, StudentId};
use crate::slot::{Occurrence, Slot};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// A request rejected by an admission predicate
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum PolicyViolation {
    #[error("{occurrence} is full ({seats_used}/{capacity})")]
    Full {
        occurrence: Occurrence,
        seats_used: u32,
        capacity: u32,
    },
    #[error("roster for {slot} is full ({seats_used}/{capacity})")]
    RosterFull {
        slot: Slot,
        seats_used: u32,
        capacity: u32,
    },
    #[error("too late for {occurrence}: cutoff was {cutoff}")]
    PastCutoff {
        occurrence: Occurrence,
        cutoff: NaiveDateTime,
    },
    #[error("{student} already attends {target}")]
    SelfConflict { student: StudentId, target: String },
    #[error("{student} already used holding {existing} this enrollment cycle")]
    HoldingAlreadyUsed { student: StudentId, existing: String },
    #[error("{student} has {active} active makeups, {allowed} allowed")]
    MakeupQuotaExceeded {
        student: StudentId,
        active: u32,
        allowed: u32,
    },
    #[error("{student} already has a makeup out of {occurrence}")]
    DuplicateOriginal {
        student: StudentId,
        occurrence: Occurrence,
    },
    #[error("makeup must move to a different class than {occurrence}")]
    SameClass { occurrence: Occurrence },
    #[error("{student} does not attend {occurrence}")]
    NotAttending {
        student: StudentId,
        occurrence: Occurrence,
    },
    #[error("{slot} is disabled")]
    SlotDisabled { slot: Slot },
    #[error("{slot} is locked on {date}")]
    SlotLocked { slot: Slot, date: NaiveDate },
    #[error("{date} is a holiday ({reason})")]
    Holiday { date: NaiveDate, reason: String },
    #[error("{student} has no classes between {start} and {end}")]
    NoClassesCovered {
        student: StudentId,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("{student} is already absent on {date}")]
    DuplicateAbsence { student: StudentId, date: NaiveDate },
    #[error("{student} is not on {slot}")]
    NotOnCurrentSlot { student: StudentId, slot: Slot },
    #[error("{slot} has free seats, no waitlist needed")]
    DesiredNotFull { slot: Slot },
    #[error("{student} is already waiting for {desired}")]
    DuplicateWaitlist { student: StudentId, desired: Slot },
    #[error("{what} has already started (cutoff {cutoff})")]
    AlreadyStarted { what: String, cutoff: NaiveDateTime },
    #[error("{occurrence} is not a scheduled class")]
    DateMismatch { occurrence: Occurrence },
    #[error("{slot} is not a configured slot")]
    UnknownSlot { slot: Slot },
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
}

impl PolicyViolation {
    /// Name of the predicate that failed
    pub fn predicate(&self) -> &'static str {
        match self {
            PolicyViolation::Full { .. } | PolicyViolation::RosterFull { .. } => "CapacityOK",
            PolicyViolation::PastCutoff { .. } => "TimeCutoffOK",
            PolicyViolation::SelfConflict { .. } => "NoSelfConflict",
            PolicyViolation::HoldingAlreadyUsed { .. } => "OneActiveHoldingPerCycle",
            PolicyViolation::MakeupQuotaExceeded { .. } => "MakeupQuotaOK",
            PolicyViolation::DuplicateOriginal { .. } => "NoDuplicateOriginal",
            PolicyViolation::SameClass { .. } => "DistinctClasses",
            PolicyViolation::NotAttending { .. } => "OwnsOriginal",
            PolicyViolation::SlotDisabled { .. } => "SlotEnabled",
            PolicyViolation::SlotLocked { .. } => "SlotUnlocked",
            PolicyViolation::Holiday { .. } => "NotHoliday",
            PolicyViolation::NoClassesCovered { .. } => "CoversOccurrence",
            PolicyViolation::InvalidRange { .. } => "ValidRange",
            PolicyViolation::DuplicateAbsence { .. } => "NoDuplicateAbsence",
            PolicyViolation::NotOnCurrentSlot { .. } => "OwnsCurrent",
            PolicyViolation::DesiredNotFull { .. } => "WaitlistRequiresFull",
            PolicyViolation::DuplicateWaitlist { .. } => "NoDuplicateWaitlist",
            PolicyViolation::AlreadyStarted { .. } => "AlreadyStarted",
            PolicyViolation::DateMismatch { .. } => "DateMatchesSlot",
            PolicyViolation::UnknownSlot { .. } => "KnownSlot",
            PolicyViolation::InvalidTransition { .. } => "ValidTransition",
        }
    }
}

type Check = Result<(), PolicyViolation>;

/// Cutoff instant: class start minus `margin`
fn cutoff_at(
    config: &SchedulerConfig,
    occurrence: &Occurrence,
    margin: Duration,
) -> Option<NaiveDateTime> {
    let start = config.starts_at(occurrence)?;
    start.checked_sub_signed(to_delta(margin))
}

pub fn capacity_ok(occupancy: &OccupancyResult) -> Check {
    if occupancy.is_full {
        return Err(PolicyViolation::Full {
            occurrence: occupancy.occurrence,
            seats_used: occupancy.seats_used,
            capacity: occupancy.capacity,
        });
    }
    Ok(())
}

/// Capacity check against permanent roster seats only
pub fn roster_capacity_ok(occupancy: &RosterOccupancy) -> Check {
    if occupancy.is_full {
        return Err(PolicyViolation::RosterFull {
            slot: occupancy.slot,
            seats_used: occupancy.seats_used,
            capacity: occupancy.capacity,
        });
    }
    Ok(())
}

pub fn distinct_classes(original: &Occurrence, makeup: &Occurrence) -> Check {
    if original == makeup {
        return Err(PolicyViolation::SameClass {
            occurrence: *original,
        });
    }
    Ok(())
}

pub fn valid_range(start: NaiveDate, end: NaiveDate) -> Check {
    if start > end {
        return Err(PolicyViolation::InvalidRange { start, end });
    }
    Ok(())
}

/// Predicates evaluated at one instant against one view of the schedule
#[derive(Clone, Copy)]
pub struct AdmissionPolicy<'a> {
    pub view: ScheduleView<'a>,
    pub now: NaiveDateTime,
}

impl<'a> AdmissionPolicy<'a> {
    pub fn new(view: ScheduleView<'a>, now: NaiveDateTime) -> Self {
        Self { view, now }
    }

    fn config(&self) -> &SchedulerConfig {
        self.view.config
    }

    pub fn known_slot(&self, slot: Slot) -> Check {
        if !self.config().has_period(slot.period) {
            return Err(PolicyViolation::UnknownSlot { slot });
        }
        Ok(())
    }

    /// The date falls on the slot's weekday and the period exists
    pub fn date_matches_slot(&self, occurrence: &Occurrence) -> Check {
        if !occurrence.is_consistent() || !self.config().has_period(occurrence.slot.period) {
            return Err(PolicyViolation::DateMismatch {
                occurrence: *occurrence,
            });
        }
        Ok(())
    }

    /// `now` is strictly before class start minus `margin`
    pub fn time_cutoff_ok(&self, occurrence: &Occurrence, margin: Duration) -> Check {
        let cutoff =
            cutoff_at(self.config(), occurrence, margin).ok_or(PolicyViolation::DateMismatch {
                occurrence: *occurrence,
            })?;
        if self.now < cutoff {
            Ok(())
        } else {
            Err(PolicyViolation::PastCutoff {
                occurrence: *occurrence,
                cutoff,
            })
        }
    }

    /// Cancellation window check; failures report `AlreadyStarted`
    pub fn not_started(&self, what: &str, occurrence: &Occurrence, margin: Duration) -> Check {
        self.time_cutoff_ok(occurrence, margin).map_err(|e| match e {
            PolicyViolation::PastCutoff { cutoff, .. } => PolicyViolation::AlreadyStarted {
                what: what.to_string(),
                cutoff,
            },
            other => other,
        })
    }

    /// The student is not already in the target occurrence
    ///
    /// Rejects a destination on one of the student's own enrolled slots, or
    /// an occurrence they are already making up into.
    pub fn no_self_conflict(&self, student: &StudentId, target: &Occurrence) -> Check {
        let own_slot = assignments_of(self.view.roster, student)
            .any(|a| a.slot == target.slot && a.is_enrolled_on(target.date));
        let already_in = self
            .view
            .overlay
            .makeups_into(target)
            .any(|m| &m.student == student);
        if own_slot || already_in {
            return Err(PolicyViolation::SelfConflict {
                student: student.clone(),
                target: target.to_string(),
            });
        }
        Ok(())
    }

    /// Slot-level self conflict for permanent moves
    pub fn no_slot_conflict(&self, student: &StudentId, slot: Slot) -> Check {
        let taken = assignments_of(self.view.roster, student)
            .any(|a| a.slot == slot && !a.has_ended_by(self.view.today));
        if taken {
            return Err(PolicyViolation::SelfConflict {
                student: student.clone(),
                target: slot.to_string(),
            });
        }
        Ok(())
    }

    /// No other active holding in the student's current enrollment cycle
    pub fn one_active_holding_per_cycle(&self, student: &StudentId) -> Check {
        let cycle = cycle_start(self.view.roster, student);
        let existing = self
            .view
            .overlay
            .active_holdings_of(student)
            .find(|h| cycle.is_none_or(|start| h.end >= start));
        match existing {
            Some(h) => Err(PolicyViolation::HoldingAlreadyUsed {
                student: student.clone(),
                existing: h.id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Active makeups stay below weekly frequency minus the week's holidays
    pub fn makeup_quota_ok(&self, student: &StudentId, original_date: NaiveDate) -> Check {
        let frequency = self.view.weekly_frequency(student, original_date);
        let holidays = self.view.holiday_count(student, original_date);
        let allowed = frequency.saturating_sub(holidays);
        let active = u32::try_from(self.view.overlay.active_makeups_of(student).count())
            .unwrap_or(u32::MAX);
        if active >= allowed {
            return Err(PolicyViolation::MakeupQuotaExceeded {
                student: student.clone(),
                active,
                allowed,
            });
        }
        Ok(())
    }

    pub fn no_duplicate_original(&self, student: &StudentId, original: &Occurrence) -> Check {
        if self.view.overlay.makeup_out(student, original).is_some() {
            return Err(PolicyViolation::DuplicateOriginal {
                student: student.clone(),
                occurrence: *original,
            });
        }
        Ok(())
    }

    /// The student is rostered into `original` and not already displaced
    pub fn owns_original(&self, student: &StudentId, original: &Occurrence) -> Check {
        let occupancy = self.view.occupancy(original.slot, original.date);
        let rostered = occupancy.attending.contains(student) && !occupancy.makeup_in.contains(student);
        if !rostered {
            return Err(PolicyViolation::NotAttending {
                student: student.clone(),
                occurrence: *original,
            });
        }
        Ok(())
    }

    pub fn slot_enabled(&self, slot: Slot) -> Check {
        if self.view.overlay.flags(slot).disabled {
            return Err(PolicyViolation::SlotDisabled { slot });
        }
        Ok(())
    }

    pub fn slot_unlocked(&self, occurrence: &Occurrence) -> Check {
        let flags = self.view.overlay.flags(occurrence.slot);
        if flags.is_locked_for(occurrence.date, self.view.today) {
            return Err(PolicyViolation::SlotLocked {
                slot: occurrence.slot,
                date: occurrence.date,
            });
        }
        Ok(())
    }

    pub fn not_holiday(&self, date: NaiveDate) -> Check {
        match self.view.overlay.holiday(date) {
            Some(h) => Err(PolicyViolation::Holiday {
                date,
                reason: h.reason.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn no_duplicate_absence(&self, student: &StudentId, date: NaiveDate) -> Check {
        if self.view.overlay.absence_on(student, date).is_some() {
            return Err(PolicyViolation::DuplicateAbsence {
                student: student.clone(),
                date,
            });
        }
        Ok(())
    }

    /// The student currently holds `slot` on the roster
    pub fn owns_current(&self, student: &StudentId, slot: Slot) -> Check {
        let holds = assignments_of(self.view.roster, student)
            .any(|a| a.slot == slot && !a.has_ended_by(self.view.today));
        if !holds {
            return Err(PolicyViolation::NotOnCurrentSlot {
                student: student.clone(),
                slot,
            });
        }
        Ok(())
    }

    pub fn waitlist_requires_full(&self, desired: Slot) -> Check {
        if !self.view.roster_occupancy(desired).is_full {
            return Err(PolicyViolation::DesiredNotFull { slot: desired });
        }
        Ok(())
    }

    pub fn no_duplicate_waitlist(&self, student: &StudentId, desired: Slot) -> Check {
        let exists = self
            .view
            .overlay
            .open_waitlists_of(student)
            .any(|w| w.desired == desired);
        if exists {
            return Err(PolicyViolation::DuplicateWaitlist {
                student: student.clone(),
                desired,
            });
        }
        Ok(())
    }

    /// The student's non-holiday classes in `[start, end]`, at least one
    pub fn covers_occurrence(
        &self,
        student: &StudentId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Occurrence>, PolicyViolation> {
        let covered: Vec<Occurrence> = self
            .view
            .occurrences_of(student, start, end)
            .into_iter()
            .filter(|o| !self.view.overlay.is_holiday(o.date))
            .collect();
        if covered.is_empty() {
            return Err(PolicyViolation::NoClassesCovered {
                student: student.clone(),
                start,
                end,
            });
        }
        Ok(covered)
    }

    /// Every rule a new holding must pass; returns the suppressed classes
    pub fn check_holding(
        &self,
        student: &StudentId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Occurrence>, PolicyViolation> {
        valid_range(start, end)?;
        self.one_active_holding_per_cycle(student)?;
        let covered = self.covers_occurrence(student, start, end)?;
        if let Some(first) = covered.first() {
            self.time_cutoff_ok(first, self.config().margins.holding_select)?;
        }
        Ok(covered)
    }

    /// Every rule a new absence must pass; returns the first missed class
    pub fn check_absence(
        &self,
        student: &StudentId,
        date: NaiveDate,
    ) -> Result<Occurrence, PolicyViolation> {
        let covered = self.covers_occurrence(student, date, date)?;
        self.no_duplicate_absence(student, date)?;
        let first = covered
            .first()
            .copied()
            .ok_or_else(|| PolicyViolation::NoClassesCovered {
                student: student.clone(),
                start: date,
                end: date,
            })?;
        self.time_cutoff_ok(&first, Duration::ZERO)?;
        Ok(first)
    }

    /// Every rule a new makeup must pass, cheapest first
    pub fn check_makeup(
        &self,
        student: &StudentId,
        original: &Occurrence,
        makeup: &Occurrence,
    ) -> Check {
        let margins = &self.config().margins;
        distinct_classes(original, makeup)?;
        self.date_matches_slot(original)?;
        self.date_matches_slot(makeup)?;
        self.no_duplicate_original(student, original)?;
        self.owns_original(student, original)?;
        self.time_cutoff_ok(original, margins.makeup_vacate)?;
        self.time_cutoff_ok(makeup, margins.makeup_admit)?;
        self.not_holiday(makeup.date)?;
        self.slot_enabled(makeup.slot)?;
        self.slot_unlocked(makeup)?;
        self.no_self_conflict(student, makeup)?;
        self.makeup_quota_ok(student, original.date)?;
        capacity_ok(&self.view.occupancy(makeup.slot, makeup.date))
    }

    /// Every rule a new waitlist request must pass
    ///
    /// Asking for the slot the student already holds fails `NoSelfConflict`.
    pub fn check_waitlist(&self, student: &StudentId, current: Slot, desired: Slot) -> Check {
        self.known_slot(desired)?;
        self.owns_current(student, current)?;
        self.no_slot_conflict(student, desired)?;
        self.no_duplicate_waitlist(student, desired)?;
        self.waitlist_requires_full(desired)
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
