// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring student-to-slot assignments

use crate::slot::{ClassDay, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a student
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        StudentId(s)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        StudentId(s.to_string())
    }
}

/// One weekly class a student is enrolled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAssignment {
    pub student: StudentId,
    pub slot: Slot,
    pub enrollment_start: NaiveDate,
    pub enrollment_end: NaiveDate,
    /// Dates the coach agreed the student would miss, parsed from notes
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub agreed_absences: BTreeSet<NaiveDate>,
}

impl RosterAssignment {
    pub fn new(
        student: impl Into<StudentId>,
        slot: Slot,
        enrollment_start: NaiveDate,
        enrollment_end: NaiveDate,
    ) -> Self {
        Self {
            student: student.into(),
            slot,
            enrollment_start,
            enrollment_end,
            agreed_absences: BTreeSet::new(),
        }
    }

    pub fn with_agreed_absences(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.agreed_absences.extend(dates);
        self
    }

    /// Enrollment window contains `date`
    pub fn is_enrolled_on(&self, date: NaiveDate) -> bool {
        self.enrollment_start <= date && date <= self.enrollment_end
    }

    /// Enrollment starts after `date`
    pub fn is_pending_on(&self, date: NaiveDate) -> bool {
        date < self.enrollment_start
    }

    /// Enrollment ended before `date`
    pub fn has_ended_by(&self, date: NaiveDate) -> bool {
        self.enrollment_end < date
    }
}

/// Assignments belonging to one student
pub fn assignments_of<'a>(
    roster: &'a [RosterAssignment],
    student: &'a StudentId,
) -> impl Iterator<Item = &'a RosterAssignment> + 'a {
    roster.iter().filter(move |a| &a.student == student)
}

/// The weekdays a student attends while enrolled on `date`
pub fn class_days_of(
    roster: &[RosterAssignment],
    student: &StudentId,
    date: NaiveDate,
) -> BTreeSet<ClassDay> {
    assignments_of(roster, student)
        .filter(|a| a.is_enrolled_on(date))
        .map(|a| a.slot.day)
        .collect()
}

/// Earliest enrollment start among a student's assignments
///
/// This marks the start of the student's current enrollment cycle.
pub fn cycle_start(roster: &[RosterAssignment], student: &StudentId) -> Option<NaiveDate> {
    assignments_of(roster, student)
        .map(|a| a.enrollment_start)
        .min()
}
