// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler assembled over a data directory

use anyhow::{Context, Result};
use sk_adapters::{
    JsonFileRoster, LocalOverlayStore, RetryingOverlayStore, RetryingRosterProvider,
    TracedOverlayStore, TracedRosterProvider,
};
use sk_core::{SchedulerConfig, UuidIdGen};
use sk_engine::{Scheduler, SchedulerDeps};
use std::path::Path;

use crate::clock::CliClock;

pub const ROSTER_FILE: &str = "roster.json";
pub const OVERLAY_FILE: &str = "overlay.wal";
pub const CONFIG_FILE: &str = "seatkeeper.toml";

pub type Roster = TracedRosterProvider<RetryingRosterProvider<JsonFileRoster>>;
pub type Overlay = TracedOverlayStore<RetryingOverlayStore<LocalOverlayStore>>;
pub type CliScheduler = Scheduler<Roster, Overlay, CliClock, UuidIdGen>;

/// Config from `seatkeeper.toml` when present, defaults otherwise
pub fn load_config(data: &Path) -> Result<SchedulerConfig> {
    let path = data.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(SchedulerConfig::default());
    }
    SchedulerConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

/// Open the roster and overlay under `data` and wire up a scheduler
///
/// A missing roster reads as empty; the overlay WAL is created on first use.
pub fn open(data: &Path, clock: CliClock) -> Result<CliScheduler> {
    std::fs::create_dir_all(data)
        .with_context(|| format!("creating data directory {}", data.display()))?;
    let config = load_config(data)?;
    let backoff = config.retry.backoff;

    let roster = JsonFileRoster::new(data.join(ROSTER_FILE));
    let overlay_path = data.join(OVERLAY_FILE);
    let overlay = LocalOverlayStore::open(&overlay_path)
        .with_context(|| format!("opening overlay {}", overlay_path.display()))?;
    tracing::debug!(data = %data.display(), capacity = config.capacity, "data directory opened");

    let deps = SchedulerDeps {
        roster: TracedRosterProvider::new(RetryingRosterProvider::new(roster, backoff)),
        overlay: TracedOverlayStore::new(RetryingOverlayStore::new(overlay, backoff)),
    };
    Ok(Scheduler::new(deps, config, clock, UuidIdGen))
}
