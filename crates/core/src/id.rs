// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record identifier generation

use crate::record::RecordKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique overlay record identifiers
///
/// Identifiers carry the record kind as a short prefix (`mk-…`, `wl-…`) so
/// that a bare id typed by a coach is self-describing.
pub trait IdGen: Clone + Send + Sync {
    fn next(&self, kind: RecordKind) -> String;
}

/// UUID-based ID generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self, kind: RecordKind) -> String {
        format!("{}-{}", kind.prefix(), uuid::Uuid::new_v4().simple())
    }
}

/// Sequential ID generator for testing
///
/// One counter is shared across kinds, so ids also record creation order.
#[derive(Clone, Default)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self, kind: RecordKind) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", kind.prefix(), n)
    }
}
