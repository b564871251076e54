// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-lines write-ahead log of overlay operations

use crate::op::OverlayOp;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt entry at {path}:{line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct WalEntry {
    seq: u64,
    op: OverlayOp,
}

/// Append-only log; one fsynced line per operation
///
/// Several processes may hold the same log open. Writers serialize through
/// [`Wal::lock`] and catch up on each other's entries before appending.
pub struct Wal {
    path: PathBuf,
    file: File,
    sequence: u64,
}

/// Exclusive hold on the log file, released on drop
pub struct WalLock<'a> {
    wal: &'a mut Wal,
}

impl Wal {
    /// Open or create a WAL at the given path
    ///
    /// A torn final line left by an interrupted append is cut off so new
    /// entries start on a clean line.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        let (ops, valid_len) = scan(path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() > valid_len {
            file.set_len(valid_len)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            file,
            sequence: ops.len() as u64,
        })
    }

    /// Block until no other handle holds the log
    pub fn lock(&mut self) -> Result<WalLock<'_>, WalError> {
        self.file.lock_exclusive()?;
        Ok(WalLock { wal: self })
    }

    /// Append an operation, returning its sequence number
    pub fn append(&mut self, op: &OverlayOp) -> Result<u64, WalError> {
        let seq = self.sequence + 1;
        let line = serde_json::to_string(&WalEntry {
            seq,
            op: op.clone(),
        })?;
        writeln!(self.file, "{line}")?;
        self.file.sync_all()?;
        self.sequence = seq;
        Ok(seq)
    }

    /// Number of operations in the log
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Read every operation back in order
    ///
    /// A missing file is an empty log. An unparsable final line is treated
    /// as a torn write and dropped; corruption anywhere else is an error.
    pub fn replay(path: &Path) -> Result<Vec<OverlayOp>, WalError> {
        scan(path).map(|(ops, _)| ops)
    }
}

impl WalLock<'_> {
    /// Entries appended by other handles since this one last looked
    ///
    /// A torn tail left by a crashed writer is cut off first.
    pub fn catch_up(&mut self) -> Result<Vec<OverlayOp>, WalError> {
        let (mut ops, valid_len) = scan(&self.wal.path)?;
        if self.wal.file.metadata()?.len() > valid_len {
            self.wal.file.set_len(valid_len)?;
        }
        let total = ops.len() as u64;
        let seen = usize::try_from(self.wal.sequence).map_or(ops.len(), |n| n.min(ops.len()));
        let tail = ops.split_off(seen);
        self.wal.sequence = total;
        Ok(tail)
    }

    pub fn append(&mut self, op: &OverlayOp) -> Result<u64, WalError> {
        self.wal.append(op)
    }
}

impl Drop for WalLock<'_> {
    fn drop(&mut self) {
        // closing the file releases the lock anyway
        let _ = FileExt::unlock(&self.wal.file);
    }
}

/// Parse the log, returning its ops and the byte length of the valid prefix
fn scan(path: &Path) -> Result<(Vec<OverlayOp>, u64), WalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut ops = Vec::new();
    let mut valid_len = 0u64;
    let mut line = String::new();
    let mut line_no = 0usize;
    let mut pending: Option<serde_json::Error> = None;

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if let Some(source) = pending.take() {
            // a bad line followed by more data is real corruption
            return Err(WalError::Corrupt {
                path: path.to_path_buf(),
                line: line_no - 1,
                source,
            });
        }
        if line.trim().is_empty() {
            valid_len += read as u64;
            continue;
        }
        match serde_json::from_str::<WalEntry>(line.trim_end()) {
            Ok(entry) if line.ends_with('\n') => {
                ops.push(entry.op);
                valid_len += read as u64;
            }
            // complete JSON but no newline: the fsync never finished
            Ok(_) => break,
            Err(source) => pending = Some(source),
        }
    }
    Ok((ops, valid_len))
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
