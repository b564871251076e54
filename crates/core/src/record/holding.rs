// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holding state machine
//!
//! A holding suspends all of a student's classes over a date range. It is
//! one-time-use per enrollment cycle and can only be cancelled, never edited.

use super::{RecordKind, TransitionError};
use crate::event::Event;
use crate::roster::StudentId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

super::record_id!(
    /// Unique identifier for a holding
    HoldingId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingStatus {
    Active,
    Cancelled,
}

impl HoldingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HoldingStatus::Active => "active",
            HoldingStatus::Cancelled => "cancelled",
        }
    }
}

/// Inputs that change holding state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingInput {
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub id: HoldingId,
    pub student: StudentId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: HoldingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl HoldingRecord {
    pub fn new(
        id: impl Into<HoldingId>,
        student: StudentId,
        start: NaiveDate,
        end: NaiveDate,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            student,
            start,
            end,
            status: HoldingStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == HoldingStatus::Active
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Pure transition function - returns new state and events
    pub fn transition(
        &self,
        input: HoldingInput,
        now: NaiveDateTime,
    ) -> Result<(HoldingRecord, Vec<Event>), TransitionError> {
        match (self.status, input) {
            (HoldingStatus::Active, HoldingInput::Cancel) => {
                let record = HoldingRecord {
                    status: HoldingStatus::Cancelled,
                    updated_at: now,
                    ..self.clone()
                };
                let events = vec![Event::HoldingCancelled {
                    id: self.id.0.clone(),
                    student: self.student.0.clone(),
                }];
                Ok((record, events))
            }
            (HoldingStatus::Cancelled, _) => Err(TransitionError::AlreadyTerminal {
                kind: RecordKind::Holding,
                id: self.id.0.clone(),
                status: self.status.as_str(),
            }),
        }
    }
}
