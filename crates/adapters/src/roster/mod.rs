// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster provider adapters
//!
//! The roster is owned outside this system and is only eventually
//! consistent. Rows are normalized once on the way in.

mod file;
mod normalize;

pub use file::JsonFileRoster;
pub use normalize::{normalize_rows, RawRosterRow};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRosterProvider, RosterCall};

use async_trait::async_trait;
use sk_core::{RosterAssignment, Slot, StudentId};
use thiserror::Error;

/// Errors from roster operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster unavailable: {0}")]
    Unavailable(String),
    #[error("{student} has no assignment on {slot}")]
    NotFound { student: StudentId, slot: Slot },
    #[error("roster storage error: {0}")]
    Storage(String),
}

impl RosterError {
    /// Transient failure worth one retry
    pub fn is_transient(&self) -> bool {
        matches!(self, RosterError::Unavailable(_))
    }
}

/// Adapter for the recurring-assignment roster
#[async_trait]
pub trait RosterProvider: Clone + Send + Sync + 'static {
    /// Assignments on one slot, in any enrollment state
    async fn list_assignments(&self, slot: Slot) -> Result<Vec<RosterAssignment>, RosterError>;

    /// Every assignment belonging to one student
    async fn list_student_assignments(
        &self,
        student: &StudentId,
    ) -> Result<Vec<RosterAssignment>, RosterError>;

    /// The whole roster
    async fn list_all(&self) -> Result<Vec<RosterAssignment>, RosterError>;

    /// Move a student's assignment from `old` to `new`, keeping its dates
    async fn rewrite_assignment_slot(
        &self,
        student: &StudentId,
        old: Slot,
        new: Slot,
    ) -> Result<(), RosterError>;
}

/// Whether a rewrite from `old` to `new` has already landed
pub(crate) fn rewrite_landed(assignments: &[RosterAssignment], old: Slot, new: Slot) -> bool {
    assignments.iter().any(|a| a.slot == new) && !assignments.iter().any(|a| a.slot == old)
}

/// Apply a slot rewrite to an in-memory roster
pub(crate) fn rewrite_in_place(
    roster: &mut [RosterAssignment],
    student: &StudentId,
    old: Slot,
    new: Slot,
) -> Result<(), RosterError> {
    let assignment = roster
        .iter_mut()
        .find(|a| &a.student == student && a.slot == old)
        .ok_or_else(|| RosterError::NotFound {
            student: student.clone(),
            slot: old,
        })?;
    assignment.slot = new;
    Ok(())
}
