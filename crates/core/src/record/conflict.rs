// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capacity conflicts awaiting a coach decision

use crate::slot::Occurrence;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

super::record_id!(
    /// Unique identifier for a capacity conflict
    ConflictId
);

/// An occurrence found over capacity after a committed write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub id: ConflictId,
    pub occurrence: Occurrence,
    pub seats_used: u32,
    pub capacity: u32,
    /// Request whose commit exposed the overshoot
    pub cause: String,
    pub detected_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<NaiveDateTime>,
}

impl ConflictRecord {
    pub fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }
}
