// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coach-controlled per-slot flags

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Disabled/locked state of a slot
///
/// `disabled` cancels the class outright until toggled back. A lock is tied
/// to one date: it blocks makeup admission into that occurrence only and
/// lapses once the date has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFlags {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_on: Option<NaiveDate>,
}

impl SlotFlags {
    /// The lock date, unless it has lapsed by `today`
    pub fn active_lock(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.locked_on.filter(|d| *d >= today)
    }

    /// Whether makeups into the occurrence on `date` are blocked
    pub fn is_locked_for(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.active_lock(today) == Some(date)
    }

    pub fn toggled_disabled(self) -> Self {
        Self {
            disabled: !self.disabled,
            ..self
        }
    }

    /// Flip the lock for `date`; a lapsed lock counts as unlocked
    pub fn toggled_lock(self, date: NaiveDate, today: NaiveDate) -> Self {
        let locked_on = if self.is_locked_for(date, today) {
            None
        } else {
            Some(date)
        };
        Self { locked_on, ..self }
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
