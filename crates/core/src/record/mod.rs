// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overlay records and their state machines
//!
//! Each request kind is a small state machine with a pure `transition`
//! function returning the updated record and the events it produced.
//! Records are never deleted: terminal records stay queryable.

mod absence;
mod conflict;
mod flags;
mod holding;
mod holiday;
mod makeup;
mod waitlist;

pub use absence::{AbsenceId, AbsenceInput, AbsenceRecord, AbsenceStatus};
pub use conflict::{ConflictId, ConflictRecord};
pub use flags::SlotFlags;
pub use holding::{HoldingId, HoldingInput, HoldingRecord, HoldingStatus};
pub use holiday::HolidayRecord;
pub use makeup::{MakeupId, MakeupInput, MakeupRequest, MakeupStatus};
pub use waitlist::{WaitlistId, WaitlistInput, WaitlistRequest, WaitlistStatus};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kinds of record held by the overlay store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Holding,
    Absence,
    Makeup,
    Waitlist,
    Holiday,
    Conflict,
}

impl RecordKind {
    /// Short prefix used in generated ids
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Holding => "hd",
            RecordKind::Absence => "ab",
            RecordKind::Makeup => "mk",
            RecordKind::Waitlist => "wl",
            RecordKind::Holiday => "hl",
            RecordKind::Conflict => "cf",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Holding => "holding",
            RecordKind::Absence => "absence",
            RecordKind::Makeup => "makeup",
            RecordKind::Waitlist => "waitlist",
            RecordKind::Holiday => "holiday",
            RecordKind::Conflict => "conflict",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected state machine transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{kind} {id} is already {status}")]
    AlreadyTerminal {
        kind: RecordKind,
        id: String,
        status: &'static str,
    },
    #[error("{kind} {id} cannot move from {from} to {to}")]
    NotAllowed {
        kind: RecordKind,
        id: String,
        from: &'static str,
        to: &'static str,
    },
}

/// Declare a string-backed record id newtype
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

pub(crate) use record_id;
