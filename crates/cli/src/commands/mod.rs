// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod absence;
pub mod conflict;
pub mod holding;
pub mod holiday;
pub mod makeup;
pub mod slot;
pub mod view;
pub mod waitlist;

use chrono::NaiveDate;
use sk_core::{Occurrence, Slot};

/// Parse `SLOT@DATE`, e.g. `Tue2@2026-02-10`
pub fn parse_occurrence(s: &str) -> Result<Occurrence, String> {
    let (slot, date) = s
        .split_once('@')
        .ok_or_else(|| format!("expected SLOT@YYYY-MM-DD, got '{}'", s))?;
    let slot: Slot = slot.parse().map_err(|e| format!("{}", e))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("bad date '{}': {}", date, e))?;
    Ok(Occurrence::new(date, slot))
}
