// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the roster and overlay collaborators

pub mod overlay;
pub mod retry;
pub mod roster;
pub mod traced;

pub use overlay::{CommitGuard, LocalOverlayStore, OverlayError, OverlayStore};
pub use retry::{RetryingOverlayStore, RetryingRosterProvider};
pub use roster::{normalize_rows, JsonFileRoster, RawRosterRow, RosterError, RosterProvider};
pub use traced::{TracedOverlayStore, TracedRosterProvider};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use overlay::{FakeOverlayStore, OverlayCall};
#[cfg(any(test, feature = "test-support"))]
pub use roster::{FakeRosterProvider, RosterCall};
