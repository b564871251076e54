// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waitlist request state machine
//!
//! A standing request to move permanently from one slot to a full one.
//!
//! ```text
//! waiting ──(seat frees)──▶ notified ──(student confirms)──▶ accepted
//!    └───────────────┴──────(student cancels)──▶ cancelled
//! ```

use super::{RecordKind, TransitionError};
use crate::event::Event;
use crate::roster::StudentId;
use crate::slot::Slot;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

super::record_id!(
    /// Unique identifier for a waitlist request
    WaitlistId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Waiting,
    Notified,
    Accepted,
    Cancelled,
}

impl WaitlistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WaitlistStatus::Waiting => "waiting",
            WaitlistStatus::Notified => "notified",
            WaitlistStatus::Accepted => "accepted",
            WaitlistStatus::Cancelled => "cancelled",
        }
    }

    /// Still waiting for, or holding an offer of, a seat
    pub fn is_open(self) -> bool {
        matches!(self, WaitlistStatus::Waiting | WaitlistStatus::Notified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistInput {
    /// A seat freed up in the desired slot
    Notify,
    /// The student confirmed the move
    Accept,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub id: WaitlistId,
    pub student: StudentId,
    pub current: Slot,
    pub desired: Slot,
    pub status: WaitlistStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<NaiveDateTime>,
}

impl WaitlistRequest {
    pub fn new(
        id: impl Into<WaitlistId>,
        student: StudentId,
        current: Slot,
        desired: Slot,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            student,
            current,
            desired,
            status: WaitlistStatus::Waiting,
            created_at: now,
            updated_at: now,
            notified_at: None,
        }
    }

    pub fn transition(
        &self,
        input: WaitlistInput,
        now: NaiveDateTime,
    ) -> Result<(WaitlistRequest, Vec<Event>), TransitionError> {
        let id = self.id.0.clone();
        let student = self.student.0.clone();

        match (self.status, input) {
            (WaitlistStatus::Accepted | WaitlistStatus::Cancelled, _) => {
                Err(TransitionError::AlreadyTerminal {
                    kind: RecordKind::Waitlist,
                    id,
                    status: self.status.as_str(),
                })
            }

            (WaitlistStatus::Waiting, WaitlistInput::Notify) => {
                let record = WaitlistRequest {
                    status: WaitlistStatus::Notified,
                    updated_at: now,
                    notified_at: Some(now),
                    ..self.clone()
                };
                let events = vec![Event::WaitlistNotified {
                    id,
                    student,
                    desired: self.desired,
                }];
                Ok((record, events))
            }

            (WaitlistStatus::Notified, WaitlistInput::Accept) => {
                let record = WaitlistRequest {
                    status: WaitlistStatus::Accepted,
                    updated_at: now,
                    ..self.clone()
                };
                let events = vec![Event::WaitlistAccepted {
                    id,
                    student,
                    current: self.current,
                    desired: self.desired,
                }];
                Ok((record, events))
            }

            (WaitlistStatus::Waiting | WaitlistStatus::Notified, WaitlistInput::Cancel) => {
                let record = WaitlistRequest {
                    status: WaitlistStatus::Cancelled,
                    updated_at: now,
                    ..self.clone()
                };
                Ok((record, vec![Event::WaitlistCancelled { id, student }]))
            }

            (from, input) => Err(TransitionError::NotAllowed {
                kind: RecordKind::Waitlist,
                id,
                from: from.as_str(),
                to: match input {
                    WaitlistInput::Notify => "notified",
                    WaitlistInput::Accept => "accepted",
                    WaitlistInput::Cancel => "cancelled",
                },
            }),
        }
    }
}
