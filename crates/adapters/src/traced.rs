// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::overlay::{CommitGuard, OverlayError, OverlayStore};
use crate::roster::{RosterError, RosterProvider};
use async_trait::async_trait;
use sk_core::{OverlaySnapshot, RecordKind, RosterAssignment, Slot, StudentId};
use sk_storage::{OverlayOp, OverlayRecord, RecordFilter};
use tracing::Instrument;

/// Wrapper that adds tracing to any RosterProvider
#[derive(Clone)]
pub struct TracedRosterProvider<R> {
    inner: R,
}

impl<R> TracedRosterProvider<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RosterProvider> RosterProvider for TracedRosterProvider<R> {
    async fn list_assignments(&self, slot: Slot) -> Result<Vec<RosterAssignment>, RosterError> {
        let result = self.inner.list_assignments(slot).await;
        match &result {
            Ok(found) => tracing::trace!(%slot, count = found.len(), "listed assignments"),
            Err(e) => tracing::warn!(%slot, error = %e, "list assignments failed"),
        }
        result
    }

    async fn list_student_assignments(
        &self,
        student: &StudentId,
    ) -> Result<Vec<RosterAssignment>, RosterError> {
        let result = self.inner.list_student_assignments(student).await;
        match &result {
            Ok(found) => tracing::trace!(%student, count = found.len(), "listed student assignments"),
            Err(e) => tracing::warn!(%student, error = %e, "list student assignments failed"),
        }
        result
    }

    async fn list_all(&self) -> Result<Vec<RosterAssignment>, RosterError> {
        let span = tracing::debug_span!("roster.list_all");
        async {
            let start = std::time::Instant::now();
            let result = self.inner.list_all().await;
            let elapsed = start.elapsed();
            match &result {
                Ok(found) => tracing::debug!(
                    count = found.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "roster loaded"
                ),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "roster load failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn rewrite_assignment_slot(
        &self,
        student: &StudentId,
        old: Slot,
        new: Slot,
    ) -> Result<(), RosterError> {
        let span = tracing::info_span!("roster.rewrite", %student, %old, %new);
        async {
            tracing::info!("rewriting assignment");

            let start = std::time::Instant::now();
            let result = self.inner.rewrite_assignment_slot(student, old, new).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "assignment rewritten"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "rewrite failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any OverlayStore
#[derive(Clone)]
pub struct TracedOverlayStore<O> {
    inner: O,
}

impl<O> TracedOverlayStore<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<O: OverlayStore> OverlayStore for TracedOverlayStore<O> {
    async fn snapshot(&self) -> Result<OverlaySnapshot, OverlayError> {
        let result = self.inner.snapshot().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "overlay snapshot failed");
        }
        result
    }

    async fn list_active(
        &self,
        kind: RecordKind,
        filter: &RecordFilter,
    ) -> Result<Vec<OverlayRecord>, OverlayError> {
        let result = self.inner.list_active(kind, filter).await;
        tracing::trace!(%kind, count = ?result.as_ref().map(|r| r.len()).ok(), "listed active");
        result
    }

    async fn get(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, OverlayError> {
        let result = self.inner.get(kind, id).await;
        tracing::trace!(%kind, id, found = result.is_ok(), "looked up");
        result
    }

    async fn apply(&self, op: OverlayOp, guard: Option<CommitGuard>) -> Result<(), OverlayError> {
        let span = tracing::info_span!(
            "overlay.apply",
            op = op.name(),
            id = op.record_id().as_deref().unwrap_or("-"),
        );
        async {
            tracing::debug!(guarded = guard.is_some(), "applying");

            let start = std::time::Instant::now();
            let result = self.inner.apply(op, guard).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "applied"
                ),
                Err(e @ OverlayError::GenerationMismatch { .. }) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "commit lost race"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "apply failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
