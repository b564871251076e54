// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Makeup request state machine
//!
//! Moves one occurrence of a student's class to another slot/date.
//!
//! ```text
//! active ──(destination started)──▶ completed
//!    └──────(student cancels)──────▶ cancelled
//! ```

use super::{RecordKind, TransitionError};
use crate::event::Event;
use crate::roster::StudentId;
use crate::slot::Occurrence;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

super::record_id!(
    /// Unique identifier for a makeup request
    MakeupId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeupStatus {
    Active,
    Completed,
    Cancelled,
}

impl MakeupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MakeupStatus::Active => "active",
            MakeupStatus::Completed => "completed",
            MakeupStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, MakeupStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakeupInput {
    /// The makeup class has started
    Complete,
    /// The student withdrew the request
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeupRequest {
    pub id: MakeupId,
    pub student: StudentId,
    /// Class the student vacates
    pub original: Occurrence,
    /// Class the student attends instead
    pub makeup: Occurrence,
    pub status: MakeupStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MakeupRequest {
    pub fn new(
        id: impl Into<MakeupId>,
        student: StudentId,
        original: Occurrence,
        makeup: Occurrence,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            student,
            original,
            makeup,
            status: MakeupStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MakeupStatus::Active
    }

    /// Whether the student occupies the makeup seat (booked or already held)
    pub fn holds_seat(&self) -> bool {
        matches!(self.status, MakeupStatus::Active | MakeupStatus::Completed)
    }

    pub fn transition(
        &self,
        input: MakeupInput,
        now: NaiveDateTime,
    ) -> Result<(MakeupRequest, Vec<Event>), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::AlreadyTerminal {
                kind: RecordKind::Makeup,
                id: self.id.0.clone(),
                status: self.status.as_str(),
            });
        }

        let (status, event) = match input {
            MakeupInput::Complete => (
                MakeupStatus::Completed,
                Event::MakeupCompleted {
                    id: self.id.0.clone(),
                    student: self.student.0.clone(),
                },
            ),
            MakeupInput::Cancel => (
                MakeupStatus::Cancelled,
                Event::MakeupCancelled {
                    id: self.id.0.clone(),
                    student: self.student.0.clone(),
                },
            ),
        };

        let record = MakeupRequest {
            status,
            updated_at: now,
            ..self.clone()
        };
        Ok((record, vec![event]))
    }
}
