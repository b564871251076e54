// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake roster provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{rewrite_in_place, RosterError, RosterProvider};
use async_trait::async_trait;
use sk_core::{RosterAssignment, Slot, StudentId};
use std::sync::{Arc, Mutex};

/// Recorded roster call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterCall {
    ListAssignments { slot: Slot },
    ListStudentAssignments { student: StudentId },
    ListAll,
    RewriteAssignmentSlot { student: StudentId, old: Slot, new: Slot },
}

#[derive(Default)]
struct FakeRosterState {
    assignments: Vec<RosterAssignment>,
    calls: Vec<RosterCall>,
    /// Calls left to fail with `Unavailable`
    failures: u32,
    /// Next rewrite lands but reports `Unavailable`
    lose_rewrite_ack: bool,
}

/// In-memory roster with call recording and failure injection
#[derive(Clone, Default)]
pub struct FakeRosterProvider {
    inner: Arc<Mutex<FakeRosterState>>,
}

impl FakeRosterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<RosterAssignment>) -> Self {
        let fake = Self::default();
        fake.set_assignments(assignments);
        fake
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeRosterState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_assignments(&self, assignments: Vec<RosterAssignment>) {
        self.state().assignments = assignments;
    }

    /// Add an assignment behind the scheduler's back
    pub fn push(&self, assignment: RosterAssignment) {
        self.state().assignments.push(assignment);
    }

    pub fn assignments(&self) -> Vec<RosterAssignment> {
        self.state().assignments.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RosterCall> {
        self.state().calls.clone()
    }

    /// Fail the next `count` calls with `Unavailable`
    pub fn fail_next(&self, count: u32) {
        self.state().failures = count;
    }

    /// Apply the next rewrite but report it as failed
    pub fn lose_next_rewrite_ack(&self) {
        self.state().lose_rewrite_ack = true;
    }

    fn begin(&self, call: RosterCall) -> Result<std::sync::MutexGuard<'_, FakeRosterState>, RosterError> {
        let mut state = self.state();
        state.calls.push(call);
        if state.failures > 0 {
            state.failures -= 1;
            return Err(RosterError::Unavailable("injected failure".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl RosterProvider for FakeRosterProvider {
    async fn list_assignments(&self, slot: Slot) -> Result<Vec<RosterAssignment>, RosterError> {
        let state = self.begin(RosterCall::ListAssignments { slot })?;
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.slot == slot)
            .cloned()
            .collect())
    }

    async fn list_student_assignments(
        &self,
        student: &StudentId,
    ) -> Result<Vec<RosterAssignment>, RosterError> {
        let state = self.begin(RosterCall::ListStudentAssignments {
            student: student.clone(),
        })?;
        Ok(state
            .assignments
            .iter()
            .filter(|a| &a.student == student)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<RosterAssignment>, RosterError> {
        let state = self.begin(RosterCall::ListAll)?;
        Ok(state.assignments.clone())
    }

    async fn rewrite_assignment_slot(
        &self,
        student: &StudentId,
        old: Slot,
        new: Slot,
    ) -> Result<(), RosterError> {
        let mut state = self.begin(RosterCall::RewriteAssignmentSlot {
            student: student.clone(),
            old,
            new,
        })?;
        rewrite_in_place(&mut state.assignments, student, old, new)?;
        if state.lose_rewrite_ack {
            state.lose_rewrite_ack = false;
            return Err(RosterError::Unavailable("ack lost".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
