// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::overlay::{FakeOverlayStore, OverlayCall};
use crate::roster::{FakeRosterProvider, RosterCall};
use chrono::NaiveDate;
use sk_core::{HolidayRecord, Occurrence};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn slot(code: &str) -> Slot {
    code.parse().unwrap()
}

fn alice_roster() -> FakeRosterProvider {
    FakeRosterProvider::with_assignments(vec![RosterAssignment::new(
        "alice",
        slot("Tue2"),
        date("2026-01-05"),
        date("2026-06-30"),
    )])
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_rewrite_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedRosterProvider::new(alice_roster());
        traced
            .rewrite_assignment_slot(&StudentId::from("alice"), slot("Tue2"), slot("Thu4"))
            .await
    });

    assert!(result.is_ok(), "rewrite should succeed: {:?}", result);
    assert!(logs.contains("roster.rewrite"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("alice"), "Should log student. Logs:\n{}", logs);
    assert!(logs.contains("rewriting assignment"), "Should log entry. Logs:\n{}", logs);
    assert!(logs.contains("assignment rewritten"), "Should log completion. Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{}", logs);
}

#[test]
fn traced_rewrite_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedRosterProvider::new(alice_roster());
        traced
            .rewrite_assignment_slot(&StudentId::from("bob"), slot("Tue2"), slot("Thu4"))
            .await
    });

    assert!(result.is_err());
    assert!(logs.contains("rewrite failed"), "Should log failure. Logs:\n{}", logs);
}

#[test]
fn traced_apply_logs_op_and_id() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedOverlayStore::new(FakeOverlayStore::new());
        traced
            .apply(
                OverlayOp::PutHoliday(HolidayRecord::new(date("2026-02-11"), "founding day")),
                None,
            )
            .await
    });

    assert!(result.is_ok());
    assert!(logs.contains("overlay.apply"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("put_holiday"), "Should log op name. Logs:\n{}", logs);
    assert!(logs.contains("2026-02-11"), "Should log record id. Logs:\n{}", logs);
    assert!(logs.contains("applied"), "Should log completion. Logs:\n{}", logs);
}

#[test]
fn traced_apply_warns_on_lost_race() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedOverlayStore::new(FakeOverlayStore::new());
        let stale =
            CommitGuard::new().expect(Occurrence::new(date("2026-02-12"), slot("Thu4")), 2);
        traced
            .apply(
                OverlayOp::SetSlotFlags {
                    slot: slot("Thu4"),
                    flags: Default::default(),
                },
                Some(stale),
            )
            .await
    });

    assert!(matches!(result, Err(OverlayError::GenerationMismatch { .. })));
    assert!(logs.contains("commit lost race"), "Should warn. Logs:\n{}", logs);
    assert!(logs.contains("WARN"), "Should log at warn level. Logs:\n{}", logs);
}

// =============================================================================
// Delegation tests - verify traced wrapper delegates to inner adapter
// =============================================================================

#[tokio::test]
async fn traced_roster_delegates_to_inner() {
    let fake = alice_roster();
    let traced = TracedRosterProvider::new(fake.clone());

    let found = traced.list_assignments(slot("Tue2")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        fake.calls(),
        vec![RosterCall::ListAssignments { slot: slot("Tue2") }]
    );
}

#[tokio::test]
async fn traced_overlay_delegates_to_inner() {
    let fake = FakeOverlayStore::new();
    let traced = TracedOverlayStore::new(fake.clone());

    traced.snapshot().await.unwrap();
    let missing = traced.get(RecordKind::Makeup, "mk-1").await;

    assert!(missing.is_err());
    assert_eq!(
        fake.calls(),
        vec![
            OverlayCall::Snapshot,
            OverlayCall::Get {
                kind: RecordKind::Makeup,
                id: "mk-1".to_string()
            }
        ]
    );
}
