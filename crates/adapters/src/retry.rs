// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot retry wrappers for transient collaborator failures
//!
//! Each call gets at most one retry after a fixed backoff. Writes check
//! whether the first attempt landed before repeating it, so a lost
//! acknowledgement never turns into a double write.

use crate::overlay::{CommitGuard, OverlayError, OverlayStore};
use crate::roster::{rewrite_landed, RosterError, RosterProvider};
use async_trait::async_trait;
use sk_core::{OverlaySnapshot, RecordKind, RosterAssignment, Slot, StudentId};
use sk_storage::{OverlayOp, OverlayRecord, RecordFilter};
use std::time::Duration;

/// Retries transient roster failures once
#[derive(Clone)]
pub struct RetryingRosterProvider<R> {
    inner: R,
    backoff: Duration,
}

impl<R> RetryingRosterProvider<R> {
    pub fn new(inner: R, backoff: Duration) -> Self {
        Self { inner, backoff }
    }
}

impl<R: RosterProvider> RetryingRosterProvider<R> {
    async fn pause(&self, op: &str, error: &RosterError) {
        tracing::warn!(op, error = %error, backoff_ms = self.backoff.as_millis() as u64, "roster call failed, retrying");
        tokio::time::sleep(self.backoff).await;
    }
}

#[async_trait]
impl<R: RosterProvider> RosterProvider for RetryingRosterProvider<R> {
    async fn list_assignments(&self, slot: Slot) -> Result<Vec<RosterAssignment>, RosterError> {
        match self.inner.list_assignments(slot).await {
            Err(e) if e.is_transient() => {
                self.pause("list_assignments", &e).await;
                self.inner.list_assignments(slot).await
            }
            result => result,
        }
    }

    async fn list_student_assignments(
        &self,
        student: &StudentId,
    ) -> Result<Vec<RosterAssignment>, RosterError> {
        match self.inner.list_student_assignments(student).await {
            Err(e) if e.is_transient() => {
                self.pause("list_student_assignments", &e).await;
                self.inner.list_student_assignments(student).await
            }
            result => result,
        }
    }

    async fn list_all(&self) -> Result<Vec<RosterAssignment>, RosterError> {
        match self.inner.list_all().await {
            Err(e) if e.is_transient() => {
                self.pause("list_all", &e).await;
                self.inner.list_all().await
            }
            result => result,
        }
    }

    async fn rewrite_assignment_slot(
        &self,
        student: &StudentId,
        old: Slot,
        new: Slot,
    ) -> Result<(), RosterError> {
        match self.inner.rewrite_assignment_slot(student, old, new).await {
            Err(e) if e.is_transient() => {
                self.pause("rewrite_assignment_slot", &e).await;
                let current = self.inner.list_student_assignments(student).await?;
                if rewrite_landed(&current, old, new) {
                    tracing::debug!(%student, %old, %new, "rewrite already landed");
                    return Ok(());
                }
                self.inner.rewrite_assignment_slot(student, old, new).await
            }
            result => result,
        }
    }
}

/// Retries transient overlay failures once
///
/// Generation mismatches are never retried: the caller has to re-read and
/// re-validate.
#[derive(Clone)]
pub struct RetryingOverlayStore<O> {
    inner: O,
    backoff: Duration,
}

impl<O> RetryingOverlayStore<O> {
    pub fn new(inner: O, backoff: Duration) -> Self {
        Self { inner, backoff }
    }
}

impl<O: OverlayStore> RetryingOverlayStore<O> {
    async fn pause(&self, op: &str, error: &OverlayError) {
        tracing::warn!(op, error = %error, backoff_ms = self.backoff.as_millis() as u64, "overlay call failed, retrying");
        tokio::time::sleep(self.backoff).await;
    }

    /// Whether `op` is already reflected in the store
    async fn landed(&self, op: &OverlayOp) -> Result<bool, OverlayError> {
        match (op, op.record()) {
            (OverlayOp::SetSlotFlags { slot, flags }, _) => {
                Ok(self.inner.snapshot().await?.flags(*slot) == *flags)
            }
            (_, Some(expected)) => {
                let id = op.record_id().unwrap_or_default();
                match self.inner.get(expected.kind(), &id).await {
                    Ok(stored) => Ok(stored == expected),
                    Err(OverlayError::NotFound { .. }) => Ok(false),
                    Err(e) => Err(e),
                }
            }
            (_, None) => Ok(false),
        }
    }
}

#[async_trait]
impl<O: OverlayStore> OverlayStore for RetryingOverlayStore<O> {
    async fn snapshot(&self) -> Result<OverlaySnapshot, OverlayError> {
        match self.inner.snapshot().await {
            Err(e) if e.is_transient() => {
                self.pause("snapshot", &e).await;
                self.inner.snapshot().await
            }
            result => result,
        }
    }

    async fn list_active(
        &self,
        kind: RecordKind,
        filter: &RecordFilter,
    ) -> Result<Vec<OverlayRecord>, OverlayError> {
        match self.inner.list_active(kind, filter).await {
            Err(e) if e.is_transient() => {
                self.pause("list_active", &e).await;
                self.inner.list_active(kind, filter).await
            }
            result => result,
        }
    }

    async fn get(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, OverlayError> {
        match self.inner.get(kind, id).await {
            Err(e) if e.is_transient() => {
                self.pause("get", &e).await;
                self.inner.get(kind, id).await
            }
            result => result,
        }
    }

    async fn apply(&self, op: OverlayOp, guard: Option<CommitGuard>) -> Result<(), OverlayError> {
        match self.inner.apply(op.clone(), guard.clone()).await {
            Err(e) if e.is_transient() => {
                self.pause(op.name(), &e).await;
                if self.landed(&op).await? {
                    tracing::debug!(op = op.name(), "write already landed");
                    return Ok(());
                }
                self.inner.apply(op, guard).await
            }
            result => result,
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
