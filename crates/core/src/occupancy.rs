// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Occupancy calculator
//!
//! Merges the roster with the overlay to answer "who is actually in this
//! class on this date". Everything here is a pure read over borrowed data:
//! no writes, no clocks beyond the `today` it is handed.

use crate::calendar::{class_week, extend_enrollment_end, week_start};
use crate::config::SchedulerConfig;
use crate::overlay::OverlaySnapshot;
use crate::record::HoldingRecord;
use crate::roster::{assignments_of, RosterAssignment, StudentId};
use crate::slot::{ClassDay, Occurrence, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Why a rostered student is not in the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplacedReason {
    Holding,
    Absence,
    AgreedAbsence,
    MakeupOut,
}

impl DisplacedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplacedReason::Holding => "holding",
            DisplacedReason::Absence => "absence",
            DisplacedReason::AgreedAbsence => "agreed-absence",
            DisplacedReason::MakeupOut => "makeup-out",
        }
    }
}

/// Whether the class meets at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassStatus {
    Open,
    /// Slot disabled by the coach
    NoClass,
}

/// Attendance for one occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyResult {
    pub occurrence: Occurrence,
    pub status: ClassStatus,
    pub capacity: u32,
    pub attending: BTreeSet<StudentId>,
    /// Students attending through a makeup (subset of `attending`)
    pub makeup_in: BTreeSet<StudentId>,
    pub displaced: BTreeMap<StudentId, DisplacedReason>,
    /// Rostered students whose enrollment has not started yet
    pub pending_start: BTreeSet<StudentId>,
    pub seats_used: u32,
    pub seats_available: u32,
    pub is_full: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
    #[serde(default)]
    pub locked: bool,
}

impl OccupancyResult {
    fn open(occurrence: Occurrence, capacity: u32) -> Self {
        Self {
            occurrence,
            status: ClassStatus::Open,
            capacity,
            attending: BTreeSet::new(),
            makeup_in: BTreeSet::new(),
            displaced: BTreeMap::new(),
            pending_start: BTreeSet::new(),
            seats_used: 0,
            seats_available: capacity,
            is_full: false,
            holiday: None,
            locked: false,
        }
    }

    fn no_class(occurrence: Occurrence, capacity: u32) -> Self {
        Self {
            status: ClassStatus::NoClass,
            seats_available: 0,
            is_full: true,
            ..Self::open(occurrence, capacity)
        }
    }

    /// Attendance tag for a student, as shown in coach views
    pub fn reason_for(&self, student: &StudentId) -> Option<&'static str> {
        if self.makeup_in.contains(student) {
            return Some("makeup-in");
        }
        self.displaced.get(student).map(|r| r.as_str())
    }

    /// More students attending than there are seats
    pub fn is_overbooked(&self) -> bool {
        self.status == ClassStatus::Open && self.seats_used > self.capacity
    }
}

/// Permanent (roster-only) occupancy of a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterOccupancy {
    pub slot: Slot,
    pub capacity: u32,
    pub students: BTreeSet<StudentId>,
    pub seats_used: u32,
    pub seats_available: u32,
    pub is_full: bool,
}

/// Occupancy of every slot in one class week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub cells: BTreeMap<Slot, OccupancyResult>,
}

impl WeekView {
    pub fn cell(&self, slot: Slot) -> Option<&OccupancyResult> {
        self.cells.get(&slot)
    }
}

/// How a student comes to be in a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudentClassKind {
    Regular,
    MakeupIn,
}

/// One class on a student's own weekly schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentClass {
    pub occurrence: Occurrence,
    pub kind: StudentClassKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displaced: Option<DisplacedReason>,
}

/// Enrollment extension owed for a holding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingExtension {
    /// Suppressed class meetings, holidays excluded
    pub suppressed: u32,
    pub enrollment_end: Option<NaiveDate>,
    pub extended_end: Option<NaiveDate>,
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Read-only reconciliation of roster and overlay
#[derive(Clone, Copy)]
pub struct ScheduleView<'a> {
    pub roster: &'a [RosterAssignment],
    pub overlay: &'a OverlaySnapshot,
    pub config: &'a SchedulerConfig,
    pub today: NaiveDate,
}

impl<'a> ScheduleView<'a> {
    pub fn new(
        roster: &'a [RosterAssignment],
        overlay: &'a OverlaySnapshot,
        config: &'a SchedulerConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            roster,
            overlay,
            config,
            today,
        }
    }

    /// Who attends `slot` on `date`
    pub fn occupancy(&self, slot: Slot, date: NaiveDate) -> OccupancyResult {
        let occurrence = Occurrence::new(date, slot);
        let flags = self.overlay.flags(slot);
        let capacity = self.config.capacity;

        let mut result = if flags.disabled {
            OccupancyResult::no_class(occurrence, capacity)
        } else {
            self.reconcile(occurrence, capacity)
        };
        result.holiday = self.overlay.holiday(date).map(|h| h.reason.clone());
        result.locked = flags.is_locked_for(date, self.today);
        result
    }

    fn reconcile(&self, occurrence: Occurrence, capacity: u32) -> OccupancyResult {
        let mut result = OccupancyResult::open(occurrence, capacity);
        let date = occurrence.date;

        for assignment in self.roster.iter().filter(|a| a.slot == occurrence.slot) {
            if assignment.is_pending_on(date) {
                result.pending_start.insert(assignment.student.clone());
                continue;
            }
            if !assignment.is_enrolled_on(date) {
                continue;
            }
            match self.displacement(assignment, &occurrence) {
                Some(reason) => {
                    result.displaced.insert(assignment.student.clone(), reason);
                }
                None => {
                    result.attending.insert(assignment.student.clone());
                }
            }
        }

        for makeup in self.overlay.makeups_into(&occurrence) {
            result.attending.insert(makeup.student.clone());
            result.makeup_in.insert(makeup.student.clone());
        }

        result.seats_used = count(result.attending.len());
        result.seats_available = capacity.saturating_sub(result.seats_used);
        result.is_full = result.seats_available == 0;
        result
    }

    /// First matching reason a rostered student is out of `occurrence`
    fn displacement(
        &self,
        assignment: &RosterAssignment,
        occurrence: &Occurrence,
    ) -> Option<DisplacedReason> {
        let student = &assignment.student;
        let date = occurrence.date;
        if self.overlay.holding_covering(student, date).is_some() {
            Some(DisplacedReason::Holding)
        } else if self.overlay.absence_on(student, date).is_some() {
            Some(DisplacedReason::Absence)
        } else if assignment.agreed_absences.contains(&date) {
            Some(DisplacedReason::AgreedAbsence)
        } else if self.overlay.makeup_out(student, occurrence).is_some() {
            Some(DisplacedReason::MakeupOut)
        } else {
            None
        }
    }

    /// Permanent seat usage of a slot, ignoring date-specific overlays
    ///
    /// Counts every assignment that has not ended by today, including ones
    /// that have not started yet: those seats are already promised.
    pub fn roster_occupancy(&self, slot: Slot) -> RosterOccupancy {
        let capacity = self.config.capacity;
        let students: BTreeSet<StudentId> = self
            .roster
            .iter()
            .filter(|a| a.slot == slot && !a.has_ended_by(self.today))
            .map(|a| a.student.clone())
            .collect();
        let seats_used = count(students.len());
        let seats_available = capacity.saturating_sub(seats_used);
        RosterOccupancy {
            slot,
            capacity,
            students,
            seats_used,
            seats_available,
            is_full: seats_available == 0,
        }
    }

    /// Occupancy of every configured slot in the week containing `date`
    pub fn week(&self, date: NaiveDate) -> WeekView {
        let monday = week_start(date);
        let cells = self
            .config
            .slots()
            .into_iter()
            .map(|slot| {
                let occurrence = slot.in_week(monday);
                (slot, self.occupancy(slot, occurrence.date))
            })
            .collect();
        WeekView {
            week_start: monday,
            cells,
        }
    }

    /// Whether the student is in the room for `occurrence`
    pub fn is_attending(&self, student: &StudentId, occurrence: &Occurrence) -> bool {
        self.occupancy(occurrence.slot, occurrence.date)
            .attending
            .contains(student)
    }

    /// A student's own classes in the week containing `date`
    pub fn student_week(&self, student: &StudentId, date: NaiveDate) -> Vec<StudentClass> {
        let week = class_week(date);
        let mut classes: Vec<StudentClass> = Vec::new();

        for assignment in assignments_of(self.roster, student) {
            for day in &week {
                let occurrence = Occurrence::new(*day, assignment.slot);
                if !occurrence.is_consistent() || !assignment.is_enrolled_on(*day) {
                    continue;
                }
                if self.overlay.flags(assignment.slot).disabled {
                    continue;
                }
                classes.push(StudentClass {
                    occurrence,
                    kind: StudentClassKind::Regular,
                    displaced: self.displacement(assignment, &occurrence),
                });
            }
        }

        for makeup in self.overlay.makeups.iter().filter(|m| {
            m.holds_seat() && &m.student == student && week.contains(&m.makeup.date)
        }) {
            classes.push(StudentClass {
                occurrence: makeup.makeup,
                kind: StudentClassKind::MakeupIn,
                displaced: None,
            });
        }

        classes.sort_by(|a, b| a.occurrence.cmp(&b.occurrence));
        classes
    }

    /// The student's rostered occurrences in `[from, to]`, in date order
    pub fn occurrences_of(
        &self,
        student: &StudentId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<Occurrence> {
        let mut out: Vec<Occurrence> = assignments_of(self.roster, student)
            .flat_map(|a| {
                from.iter_days()
                    .take_while(move |d| *d <= to)
                    .filter(move |d| ClassDay::of(*d) == Some(a.slot.day) && a.is_enrolled_on(*d))
                    .map(move |d| Occurrence::new(d, a.slot))
            })
            .collect();
        out.sort();
        out
    }

    /// Number of weekly classes the student is enrolled in on `date`
    pub fn weekly_frequency(&self, student: &StudentId, date: NaiveDate) -> u32 {
        count(
            assignments_of(self.roster, student)
                .filter(|a| a.is_enrolled_on(date))
                .count(),
        )
    }

    /// The student's own classes in the week of `date` that fall on holidays
    pub fn holiday_count(&self, student: &StudentId, date: NaiveDate) -> u32 {
        let monday = week_start(date);
        let friday = monday + chrono::Days::new(4);
        count(
            self.occurrences_of(student, monday, friday)
                .iter()
                .filter(|o| self.overlay.is_holiday(o.date))
                .count(),
        )
    }

    /// Classes a holding suppresses and the enrollment extension owed
    pub fn holding_extension(&self, holding: &HoldingRecord) -> HoldingExtension {
        let suppressed = count(
            self.occurrences_of(&holding.student, holding.start, holding.end)
                .iter()
                .filter(|o| !self.overlay.is_holiday(o.date))
                .count(),
        );

        let enrollment_end = assignments_of(self.roster, &holding.student)
            .map(|a| a.enrollment_end)
            .max();
        let extended_end = enrollment_end.map(|end| {
            let days: BTreeSet<ClassDay> = assignments_of(self.roster, &holding.student)
                .filter(|a| a.enrollment_end == end)
                .map(|a| a.slot.day)
                .collect();
            extend_enrollment_end(end, &days, suppressed, |d| self.overlay.is_holiday(d))
        });

        HoldingExtension {
            suppressed,
            enrollment_end,
            extended_end,
        }
    }
}

#[cfg(test)]
#[path = "occupancy_tests.rs"]
mod tests;
