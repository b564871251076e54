// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake overlay store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CommitGuard, LocalOverlayStore, OverlayError, OverlayStore};
use async_trait::async_trait;
use sk_core::{OverlaySnapshot, RecordKind};
use sk_storage::{OverlayOp, OverlayRecord, RecordFilter};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded overlay call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCall {
    Snapshot,
    ListActive { kind: RecordKind },
    Get { kind: RecordKind, id: String },
    Apply { op: &'static str, guarded: bool },
}

#[derive(Default)]
struct Control {
    calls: Vec<OverlayCall>,
    /// Calls left to fail with `Unavailable`
    failures: u32,
    /// Next apply lands but reports `Unavailable`
    lose_apply_ack: bool,
    /// Ops slipped in just before the next apply, as a racing writer would
    racing: VecDeque<OverlayOp>,
}

/// In-memory overlay with call recording and failure injection
#[derive(Clone)]
pub struct FakeOverlayStore {
    store: LocalOverlayStore,
    control: Arc<Mutex<Control>>,
}

impl Default for FakeOverlayStore {
    fn default() -> Self {
        Self {
            store: LocalOverlayStore::in_memory(),
            control: Arc::new(Mutex::new(Control::default())),
        }
    }
}

impl FakeOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn control(&self) -> std::sync::MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<OverlayCall> {
        self.control().calls.clone()
    }

    /// Recorded applies, by op name
    pub fn applied(&self) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                OverlayCall::Apply { op, .. } => Some(op),
                _ => None,
            })
            .collect()
    }

    /// Fail the next `count` calls with `Unavailable`
    pub fn fail_next(&self, count: u32) {
        self.control().failures = count;
    }

    /// Apply the next write but report it as failed
    pub fn lose_next_apply_ack(&self) {
        self.control().lose_apply_ack = true;
    }

    /// Have another writer commit `op` right before the next apply
    pub fn race_next_apply(&self, op: OverlayOp) {
        self.control().racing.push_back(op);
    }

    /// Write directly, bypassing recording and injection
    pub fn seed(&self, op: OverlayOp) {
        // unguarded local applies cannot fail without a WAL
        let _ = self.store.apply_now(&op, None);
    }

    pub fn peek(&self) -> OverlaySnapshot {
        // in-memory snapshots cannot fail
        self.store.snapshot_now().unwrap_or_default()
    }

    fn begin(&self, call: OverlayCall) -> Result<(), OverlayError> {
        let mut control = self.control();
        control.calls.push(call);
        if control.failures > 0 {
            control.failures -= 1;
            return Err(OverlayError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OverlayStore for FakeOverlayStore {
    async fn snapshot(&self) -> Result<OverlaySnapshot, OverlayError> {
        self.begin(OverlayCall::Snapshot)?;
        self.store.snapshot_now()
    }

    async fn list_active(
        &self,
        kind: RecordKind,
        filter: &RecordFilter,
    ) -> Result<Vec<OverlayRecord>, OverlayError> {
        self.begin(OverlayCall::ListActive { kind })?;
        self.store.list_active_now(kind, filter)
    }

    async fn get(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, OverlayError> {
        self.begin(OverlayCall::Get {
            kind,
            id: id.to_string(),
        })?;
        self.store.get_now(kind, id)
    }

    async fn apply(&self, op: OverlayOp, guard: Option<CommitGuard>) -> Result<(), OverlayError> {
        self.begin(OverlayCall::Apply {
            op: op.name(),
            guarded: guard.is_some(),
        })?;
        let (racing, lose_ack) = {
            let mut control = self.control();
            let racing: Vec<OverlayOp> = control.racing.drain(..).collect();
            (racing, std::mem::take(&mut control.lose_apply_ack))
        };
        for other in racing {
            self.seed(other);
        }
        self.store.apply_now(&op, guard.as_ref())?;
        if lose_ack {
            return Err(OverlayError::Unavailable("ack lost".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
