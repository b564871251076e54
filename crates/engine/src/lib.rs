// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Seatkeeper scheduling engine

mod coach;
mod error;
mod requests;
mod scheduler;

#[cfg(test)]
mod testing;

pub use error::ScheduleError;
pub use scheduler::{ExtensionReport, Outcome, Scheduler, SchedulerDeps};
