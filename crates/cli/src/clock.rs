// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall clock for the CLI, optionally pinned with `--now`

use chrono::NaiveDateTime;
use sk_core::{Clock, SystemClock};

const NOW_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Clone)]
pub enum CliClock {
    System(SystemClock),
    /// Every call sees the same instant
    Pinned(NaiveDateTime),
}

impl CliClock {
    pub fn from_override(now: Option<NaiveDateTime>) -> Self {
        now.map_or(CliClock::System(SystemClock), CliClock::Pinned)
    }
}

impl Clock for CliClock {
    fn now(&self) -> NaiveDateTime {
        match self {
            CliClock::System(clock) => clock.now(),
            CliClock::Pinned(now) => *now,
        }
    }
}

pub fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got '{}'", s))
}
