// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Overlay persistence: operations, materialized state, write-ahead log

mod op;
mod state;
mod wal;

pub use op::{OverlayOp, OverlayRecord, RecordFilter};
pub use state::OverlayState;
pub use wal::{Wal, WalError, WalLock};
