// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster backed by a JSON file of rows

use super::normalize::{normalize_rows, RawRosterRow};
use super::{rewrite_in_place, RosterError, RosterProvider};
use async_trait::async_trait;
use sk_core::{RosterAssignment, Slot, StudentId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reads the roster file on every call, so outside edits are picked up
///
/// Rewrites serialize the normalized assignments back, replacing the file
/// atomically via a temp file and rename.
#[derive(Clone)]
pub struct JsonFileRoster {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<RosterAssignment>, RosterError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RosterError::Unavailable(e.to_string())),
        };
        let rows: Vec<RawRosterRow> = serde_json::from_str(&text)
            .map_err(|e| RosterError::Storage(format!("{}: {e}", self.path.display())))?;
        Ok(normalize_rows(rows))
    }

    async fn store(&self, roster: &[RosterAssignment]) -> Result<(), RosterError> {
        let json =
            serde_json::to_string_pretty(roster).map_err(|e| RosterError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| RosterError::Unavailable(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RosterError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl RosterProvider for JsonFileRoster {
    async fn list_assignments(&self, slot: Slot) -> Result<Vec<RosterAssignment>, RosterError> {
        let mut roster = self.load().await?;
        roster.retain(|a| a.slot == slot);
        Ok(roster)
    }

    async fn list_student_assignments(
        &self,
        student: &StudentId,
    ) -> Result<Vec<RosterAssignment>, RosterError> {
        let mut roster = self.load().await?;
        roster.retain(|a| &a.student == student);
        Ok(roster)
    }

    async fn list_all(&self) -> Result<Vec<RosterAssignment>, RosterError> {
        self.load().await
    }

    async fn rewrite_assignment_slot(
        &self,
        student: &StudentId,
        old: Slot,
        new: Slot,
    ) -> Result<(), RosterError> {
        let _guard = self.write_lock.lock().await;
        let mut roster = self.load().await?;
        rewrite_in_place(&mut roster, student, old, new)?;
        self.store(&roster).await
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
