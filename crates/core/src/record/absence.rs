// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-date absence state machine

use super::{RecordKind, TransitionError};
use crate::event::Event;
use crate::roster::StudentId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

super::record_id!(
    /// Unique identifier for an absence
    AbsenceId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceStatus {
    Active,
    Cancelled,
}

impl AbsenceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AbsenceStatus::Active => "active",
            AbsenceStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceInput {
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    pub id: AbsenceId,
    pub student: StudentId,
    pub date: NaiveDate,
    pub status: AbsenceStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AbsenceRecord {
    pub fn new(
        id: impl Into<AbsenceId>,
        student: StudentId,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            student,
            date,
            status: AbsenceStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AbsenceStatus::Active
    }

    pub fn transition(
        &self,
        input: AbsenceInput,
        now: NaiveDateTime,
    ) -> Result<(AbsenceRecord, Vec<Event>), TransitionError> {
        match (self.status, input) {
            (AbsenceStatus::Active, AbsenceInput::Cancel) => {
                let record = AbsenceRecord {
                    status: AbsenceStatus::Cancelled,
                    updated_at: now,
                    ..self.clone()
                };
                let events = vec![Event::AbsenceCancelled {
                    id: self.id.0.clone(),
                    student: self.student.0.clone(),
                    date: self.date,
                }];
                Ok((record, events))
            }
            (AbsenceStatus::Cancelled, _) => Err(TransitionError::AlreadyTerminal {
                kind: RecordKind::Absence,
                id: self.id.0.clone(),
                status: self.status.as_str(),
            }),
        }
    }
}
