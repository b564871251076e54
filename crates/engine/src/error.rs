// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduler

use sk_adapters::{OverlayError, RosterError};
use sk_core::{PolicyViolation, RecordKind, TransitionError};
use thiserror::Error;

/// Typed failure of a scheduler operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{} rejected: {}", .0.predicate(), .0)]
    ValidationFailed(PolicyViolation),
    #[error("{kind} {id} not found")]
    NotFound { kind: String, id: String },
    #[error("{kind} {id} is already {status}")]
    AlreadyTerminal {
        kind: RecordKind,
        id: String,
        status: &'static str,
    },
    #[error("capacity conflict on {target}: {detail}")]
    CapacityConflict { target: String, detail: String },
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl ScheduleError {
    pub(crate) fn not_found(kind: RecordKind, id: &str) -> Self {
        ScheduleError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    /// Predicate name for validation failures
    pub fn predicate(&self) -> Option<&'static str> {
        match self {
            ScheduleError::ValidationFailed(v) => Some(v.predicate()),
            _ => None,
        }
    }

    /// Stable error kind for machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::ValidationFailed(_) => "validation_failed",
            ScheduleError::NotFound { .. } => "not_found",
            ScheduleError::AlreadyTerminal { .. } => "already_terminal",
            ScheduleError::CapacityConflict { .. } => "capacity_conflict",
            ScheduleError::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }
}

impl From<PolicyViolation> for ScheduleError {
    fn from(violation: PolicyViolation) -> Self {
        ScheduleError::ValidationFailed(violation)
    }
}

impl From<TransitionError> for ScheduleError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::AlreadyTerminal { kind, id, status } => {
                ScheduleError::AlreadyTerminal { kind, id, status }
            }
            TransitionError::NotAllowed { from, to, .. } => {
                ScheduleError::ValidationFailed(PolicyViolation::InvalidTransition { from, to })
            }
        }
    }
}

impl From<OverlayError> for ScheduleError {
    fn from(e: OverlayError) -> Self {
        match e {
            OverlayError::GenerationMismatch { occurrence, .. } => ScheduleError::CapacityConflict {
                target: occurrence.to_string(),
                detail: e.to_string(),
            },
            OverlayError::NotFound { kind, id } => ScheduleError::NotFound {
                kind: kind.to_string(),
                id,
            },
            OverlayError::Unavailable(_) | OverlayError::Storage(_) => {
                ScheduleError::UpstreamUnavailable(e.to_string())
            }
        }
    }
}

impl From<RosterError> for ScheduleError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::NotFound { student, slot } => ScheduleError::NotFound {
                kind: "assignment".to_string(),
                id: format!("{student}@{slot}"),
            },
            RosterError::Unavailable(_) | RosterError::Storage(_) => {
                ScheduleError::UpstreamUnavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
