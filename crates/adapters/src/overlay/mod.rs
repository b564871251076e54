// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overlay store adapters

mod local;

pub use local::LocalOverlayStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOverlayStore, OverlayCall};

use async_trait::async_trait;
use sk_core::{Occurrence, OverlaySnapshot, RecordKind};
use sk_storage::{OverlayOp, OverlayRecord, OverlayState, RecordFilter};
use thiserror::Error;

/// Errors from overlay operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("overlay unavailable: {0}")]
    Unavailable(String),
    #[error("{occurrence} changed underneath us (expected generation {expected}, found {actual})")]
    GenerationMismatch {
        occurrence: Occurrence,
        expected: u64,
        actual: u64,
    },
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: String },
    #[error("overlay storage error: {0}")]
    Storage(String),
}

impl OverlayError {
    /// Transient failure worth one retry
    pub fn is_transient(&self) -> bool {
        matches!(self, OverlayError::Unavailable(_))
    }
}

/// Generations a commit was validated against
///
/// The store rejects the write if any listed occurrence has moved on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGuard {
    pub expected: Vec<(Occurrence, u64)>,
}

impl CommitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(mut self, occurrence: Occurrence, generation: u64) -> Self {
        self.expected.push((occurrence, generation));
        self
    }

    /// Guard pinned to the generations in `snapshot`
    pub fn pinned(snapshot: &OverlaySnapshot, occurrences: &[Occurrence]) -> Self {
        occurrences
            .iter()
            .fold(Self::new(), |guard, o| guard.expect(*o, snapshot.generation(o)))
    }

    /// First stale expectation against `state`, if any
    pub(crate) fn check(&self, state: &OverlayState) -> Result<(), OverlayError> {
        for (occurrence, expected) in &self.expected {
            let actual = state.generation(occurrence);
            if actual != *expected {
                return Err(OverlayError::GenerationMismatch {
                    occurrence: *occurrence,
                    expected: *expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Adapter for overlay record storage
#[async_trait]
pub trait OverlayStore: Clone + Send + Sync + 'static {
    /// All records, flags and generations at one point in time
    async fn snapshot(&self) -> Result<OverlaySnapshot, OverlayError>;

    /// Non-terminal records of one kind
    async fn list_active(
        &self,
        kind: RecordKind,
        filter: &RecordFilter,
    ) -> Result<Vec<OverlayRecord>, OverlayError>;

    /// One record by id or unique id prefix
    async fn get(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, OverlayError>;

    /// Durably apply `op`, rejecting it if `guard` is stale
    ///
    /// Unguarded applies are idempotent upserts.
    async fn apply(&self, op: OverlayOp, guard: Option<CommitGuard>) -> Result<(), OverlayError>;
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
