// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local overlay store, optionally backed by a WAL

use super::{CommitGuard, OverlayError, OverlayStore};
use async_trait::async_trait;
use sk_core::{OverlaySnapshot, RecordKind};
use sk_storage::{OverlayOp, OverlayRecord, OverlayState, RecordFilter, Wal, WalError};
use std::path::Path;
use std::sync::{Arc, Mutex};

struct Inner {
    state: OverlayState,
    wal: Option<Wal>,
}

/// Overlay held in memory; with a WAL every op is logged before it applies
///
/// Guard checks and the write happen under the process mutex and the WAL's
/// file lock. Entries other processes appended are replayed first, so the
/// generation compare-and-apply holds across every writer of the file.
#[derive(Clone)]
pub struct LocalOverlayStore {
    inner: Arc<Mutex<Inner>>,
}

fn wal_error(e: WalError) -> OverlayError {
    match e {
        WalError::Io(io) => OverlayError::Unavailable(io.to_string()),
        other => OverlayError::Storage(other.to_string()),
    }
}

impl Inner {
    /// Replay what other writers appended since we last looked
    fn refresh(&mut self) -> Result<(), OverlayError> {
        let Some(wal) = self.wal.as_mut() else {
            return Ok(());
        };
        let tail = wal.lock().and_then(|mut held| held.catch_up()).map_err(wal_error)?;
        if !tail.is_empty() {
            tracing::debug!(ops = tail.len(), "overlay caught up");
        }
        for op in &tail {
            self.state.apply(op);
        }
        Ok(())
    }
}

impl LocalOverlayStore {
    /// Volatile store, lost on drop
    pub fn in_memory() -> Self {
        Self::from_parts(OverlayState::default(), None)
    }

    /// Durable store replayed from (and appending to) the WAL at `path`
    pub fn open(path: &Path) -> Result<Self, WalError> {
        let ops = Wal::replay(path)?;
        let state = OverlayState::replay(&ops);
        let wal = Wal::open(path)?;
        tracing::debug!(path = %path.display(), ops = ops.len(), "overlay replayed");
        Ok(Self::from_parts(state, Some(wal)))
    }

    fn from_parts(state: OverlayState, wal: Option<Wal>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { state, wal })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Synchronous apply shared with the fake store
    pub(crate) fn apply_now(
        &self,
        op: &OverlayOp,
        guard: Option<&CommitGuard>,
    ) -> Result<(), OverlayError> {
        let mut inner = self.lock();
        let Inner { state, wal } = &mut *inner;
        match wal.as_mut() {
            Some(wal) => {
                let mut held = wal.lock().map_err(wal_error)?;
                for other in held.catch_up().map_err(wal_error)? {
                    state.apply(&other);
                }
                if let Some(guard) = guard {
                    guard.check(state)?;
                }
                held.append(op).map_err(wal_error)?;
            }
            None => {
                if let Some(guard) = guard {
                    guard.check(state)?;
                }
            }
        }
        state.apply(op);
        Ok(())
    }

    pub(crate) fn snapshot_now(&self) -> Result<OverlaySnapshot, OverlayError> {
        let mut inner = self.lock();
        inner.refresh()?;
        Ok(inner.state.snapshot())
    }

    pub(crate) fn get_now(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, OverlayError> {
        let mut inner = self.lock();
        inner.refresh()?;
        inner.state.get(kind, id).ok_or_else(|| OverlayError::NotFound {
            kind,
            id: id.to_string(),
        })
    }

    pub(crate) fn list_active_now(
        &self,
        kind: RecordKind,
        filter: &RecordFilter,
    ) -> Result<Vec<OverlayRecord>, OverlayError> {
        let mut inner = self.lock();
        inner.refresh()?;
        Ok(inner.state.list_active(kind, filter))
    }
}

#[async_trait]
impl OverlayStore for LocalOverlayStore {
    async fn snapshot(&self) -> Result<OverlaySnapshot, OverlayError> {
        self.snapshot_now()
    }

    async fn list_active(
        &self,
        kind: RecordKind,
        filter: &RecordFilter,
    ) -> Result<Vec<OverlayRecord>, OverlayError> {
        self.list_active_now(kind, filter)
    }

    async fn get(&self, kind: RecordKind, id: &str) -> Result<OverlayRecord, OverlayError> {
        self.get_now(kind, id)
    }

    async fn apply(&self, op: OverlayOp, guard: Option<CommitGuard>) -> Result<(), OverlayError> {
        self.apply_now(&op, guard.as_ref())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
