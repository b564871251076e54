// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration
//!
//! Loaded from TOML. Durations use humantime strings (`"30m"`), period start
//! times use `HH:MM`.
//!
//! ```toml
//! capacity = 7
//! class_length = "90m"
//!
//! [[periods]]
//! period = 1
//! start = "09:00"
//!
//! [margins]
//! makeup_admit = "30m"
//! ```

use crate::slot::{ClassDay, Occurrence, Period, Slot};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Start time of one class period
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDef {
    pub period: Period,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
}

/// Cutoff margins before a class start
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Latest a holding may be requested or cancelled before its first class
    #[serde(with = "humantime_serde")]
    pub holding_select: Duration,
    /// Latest a makeup may be booked into a destination class
    #[serde(with = "humantime_serde")]
    pub makeup_admit: Duration,
    /// Latest a student may vacate their original class
    #[serde(with = "humantime_serde")]
    pub makeup_vacate: Duration,
    /// Latest a makeup may be cancelled before its destination class
    #[serde(with = "humantime_serde")]
    pub makeup_cancel: Duration,
    /// Latest an absence may be cancelled before its class
    #[serde(with = "humantime_serde")]
    pub absence_cancel: Duration,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            holding_select: Duration::from_secs(60 * 60),
            makeup_admit: Duration::from_secs(30 * 60),
            makeup_vacate: Duration::from_secs(10 * 60),
            makeup_cancel: Duration::from_secs(30 * 60),
            absence_cancel: Duration::ZERO,
        }
    }
}

/// Retry behavior at the I/O boundary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Pause before the single retry of an unavailable upstream call
    #[serde(with = "humantime_serde")]
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_millis(200),
        }
    }
}

/// Scheduler configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seats per class
    pub capacity: u32,
    /// Nominal class length
    #[serde(with = "humantime_serde")]
    pub class_length: Duration,
    /// Ordered class periods
    pub periods: Vec<PeriodDef>,
    pub margins: Margins,
    pub retry: RetryConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let starts = [(9, 0), (10, 30), (13, 0), (14, 30), (16, 0), (17, 30)];
        let periods = starts
            .iter()
            .zip(1u8..)
            .filter_map(|(&(h, m), n)| {
                NaiveTime::from_hms_opt(h, m, 0).map(|start| PeriodDef {
                    period: Period(n),
                    start,
                })
            })
            .collect();
        Self {
            capacity: 7,
            class_length: Duration::from_secs(90 * 60),
            periods,
            margins: Margins::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be positive".into()));
        }
        if self.periods.is_empty() {
            return Err(ConfigError::Invalid("at least one period is required".into()));
        }
        for pair in self.periods.windows(2) {
            if pair[0].period >= pair[1].period || pair[0].start >= pair[1].start {
                return Err(ConfigError::Invalid(format!(
                    "periods must be strictly ascending: {} then {}",
                    pair[0].period, pair[1].period
                )));
            }
        }
        Ok(())
    }

    /// Start time of a period, if configured
    pub fn period_start(&self, period: Period) -> Option<NaiveTime> {
        self.periods
            .iter()
            .find(|p| p.period == period)
            .map(|p| p.start)
    }

    pub fn has_period(&self, period: Period) -> bool {
        self.period_start(period).is_some()
    }

    /// Wall-clock start of an occurrence
    pub fn starts_at(&self, occurrence: &Occurrence) -> Option<NaiveDateTime> {
        self.period_start(occurrence.slot.period)
            .map(|t| occurrence.date.and_time(t))
    }

    /// Wall-clock end of an occurrence
    pub fn ends_at(&self, occurrence: &Occurrence) -> Option<NaiveDateTime> {
        let start = self.starts_at(occurrence)?;
        start.checked_add_signed(to_delta(self.class_length))
    }

    /// Every configured slot, Monday first, periods in order
    pub fn slots(&self) -> Vec<Slot> {
        ClassDay::ALL
            .iter()
            .flat_map(|&day| {
                self.periods.iter().map(move |p| Slot {
                    day,
                    period: p.period,
                })
            })
            .collect()
    }
}

/// Convert a std duration into a signed calendar delta, saturating
pub fn to_delta(duration: Duration) -> TimeDelta {
    i64::try_from(duration.as_secs())
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
