// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster row normalization
//!
//! Upstream sheets disagree on column names and date formats. Everything is
//! mapped onto [`RosterAssignment`] here so the core never sees raw rows.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sk_core::agreed::parse_agreed_absences;
use sk_core::slot::parse_schedule;
use sk_core::{RosterAssignment, StudentId};
use std::collections::BTreeSet;

/// One row as exported by the roster owner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRosterRow {
    #[serde(alias = "studentId", alias = "student_id", alias = "id", alias = "name")]
    pub student: String,
    /// Packed slot codes such as `"Tue2, Thu4"`
    #[serde(alias = "slot", alias = "slots", alias = "classes", alias = "class")]
    pub schedule: String,
    #[serde(
        alias = "enrollmentStart",
        alias = "start",
        alias = "start_date",
        deserialize_with = "lenient_date"
    )]
    pub enrollment_start: NaiveDate,
    #[serde(
        alias = "enrollmentEnd",
        alias = "end",
        alias = "end_date",
        deserialize_with = "lenient_date"
    )]
    pub enrollment_end: NaiveDate,
    /// Free text; may carry agreed absence dates
    #[serde(default, alias = "note", alias = "memo", alias = "remarks")]
    pub notes: String,
    /// Already-parsed agreed absences (rows we wrote back ourselves)
    #[serde(default)]
    pub agreed_absences: BTreeSet<NaiveDate>,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {raw}")))
}

/// Turn raw rows into assignments, one per slot
///
/// Bad schedule codes, inverted enrollment windows and repeated
/// student/slot pairs are dropped with a warning.
pub fn normalize_rows(rows: Vec<RawRosterRow>) -> Vec<RosterAssignment> {
    let mut out: Vec<RosterAssignment> = Vec::new();

    for row in rows {
        let student = StudentId::from(row.student.trim());
        if student.0.is_empty() {
            tracing::warn!(schedule = %row.schedule, "dropping roster row without student");
            continue;
        }
        if row.enrollment_end < row.enrollment_start {
            tracing::warn!(
                %student,
                start = %row.enrollment_start,
                end = %row.enrollment_end,
                "dropping roster row with inverted enrollment window"
            );
            continue;
        }

        let codes = parse_schedule(&row.schedule);
        for code in &codes.rejected {
            tracing::warn!(%student, code, "dropping schedule code");
        }

        let mut agreed = parse_agreed_absences(&row.notes, row.enrollment_start);
        agreed.extend(row.agreed_absences.iter().copied());

        for slot in codes.slots {
            if out.iter().any(|a| a.student == student && a.slot == slot) {
                tracing::warn!(%student, %slot, "dropping duplicate assignment");
                continue;
            }
            out.push(
                RosterAssignment::new(
                    student.clone(),
                    slot,
                    row.enrollment_start,
                    row.enrollment_end,
                )
                .with_agreed_absences(agreed.iter().copied()),
            );
        }
    }

    tracing::debug!(assignments = out.len(), "roster normalized");
    out
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
