// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weekly class slots and their dated occurrences
//!
//! A [`Slot`] is a recurring (weekday, period) meeting. Slots are written in
//! a compact code form such as `Tue2` or `thu-4`, which is also their serde
//! representation so they can key JSON maps.

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors from parsing slot codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotParseError {
    #[error("unknown class day: {0}")]
    UnknownDay(String),
    #[error("malformed slot code: {0}")]
    Malformed(String),
}

/// Day of the week on which classes are held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl ClassDay {
    pub const ALL: [ClassDay; 5] = [
        ClassDay::Mon,
        ClassDay::Tue,
        ClassDay::Wed,
        ClassDay::Thu,
        ClassDay::Fri,
    ];

    /// Map a calendar weekday; weekends have no classes
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(ClassDay::Mon),
            Weekday::Tue => Some(ClassDay::Tue),
            Weekday::Wed => Some(ClassDay::Wed),
            Weekday::Thu => Some(ClassDay::Thu),
            Weekday::Fri => Some(ClassDay::Fri),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    pub fn of(date: NaiveDate) -> Option<Self> {
        Self::from_weekday(date.weekday())
    }

    pub fn weekday(self) -> Weekday {
        match self {
            ClassDay::Mon => Weekday::Mon,
            ClassDay::Tue => Weekday::Tue,
            ClassDay::Wed => Weekday::Wed,
            ClassDay::Thu => Weekday::Thu,
            ClassDay::Fri => Weekday::Fri,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassDay::Mon => "Mon",
            ClassDay::Tue => "Tue",
            ClassDay::Wed => "Wed",
            ClassDay::Thu => "Thu",
            ClassDay::Fri => "Fri",
        }
    }
}

impl fmt::Display for ClassDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassDay {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(ClassDay::Mon),
            "tue" | "tues" | "tuesday" => Ok(ClassDay::Tue),
            "wed" | "wednesday" => Ok(ClassDay::Wed),
            "thu" | "thur" | "thurs" | "thursday" => Ok(ClassDay::Thu),
            "fri" | "friday" => Ok(ClassDay::Fri),
            other => Err(SlotParseError::UnknownDay(other.to_string())),
        }
    }
}

/// Ordinal of a class period within the day (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(pub u8);

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recurring weekly class meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot {
    pub day: ClassDay,
    pub period: Period,
}

impl Slot {
    pub fn new(day: ClassDay, period: u8) -> Self {
        Self {
            day,
            period: Period(period),
        }
    }

    /// The occurrence of this slot in the week starting at `week_start` (a Monday)
    pub fn in_week(self, week_start: NaiveDate) -> Occurrence {
        let offset = u64::from(self.day.weekday().num_days_from_monday());
        let date = week_start
            .checked_add_days(chrono::Days::new(offset))
            .unwrap_or(week_start);
        Occurrence::new(date, self)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.day, self.period)
    }
}

static SLOT_CODE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s*[-_ ]?\s*(\d{1,2})$"));

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let malformed = || SlotParseError::Malformed(code.to_string());
        let re = SLOT_CODE.as_ref().map_err(|_| malformed())?;
        let caps = re.captures(code).ok_or_else(malformed)?;
        let day: ClassDay = caps[1].parse()?;
        let period: u8 = caps[2].parse().map_err(|_| malformed())?;
        if period == 0 {
            return Err(malformed());
        }
        Ok(Slot::new(day, period))
    }
}

impl TryFrom<String> for Slot {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

/// Result of parsing a packed schedule string such as `"Tue2, Thu4"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleCodes {
    /// Distinct slots in the order they first appeared
    pub slots: Vec<Slot>,
    /// Codes that could not be parsed or repeated an earlier slot
    pub rejected: Vec<String>,
}

/// Parse a schedule string into slots
///
/// Codes are separated by commas, slashes, semicolons or whitespace that is
/// not between a day name and its period. One entry per slot is kept.
pub fn parse_schedule(s: &str) -> ScheduleCodes {
    let mut codes = ScheduleCodes::default();
    for raw in s.split([',', ';', '/', '|']) {
        for token in split_codes(raw) {
            match token.parse::<Slot>() {
                Ok(slot) if codes.slots.contains(&slot) => codes.rejected.push(token),
                Ok(slot) => codes.slots.push(slot),
                Err(_) => codes.rejected.push(token),
            }
        }
    }
    codes
}

/// Split on whitespace but keep `Tue 2` together
fn split_codes(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in raw.split_whitespace() {
        let joins_previous = word.chars().all(|c| c.is_ascii_digit())
            && out
                .last()
                .is_some_and(|prev| prev.chars().all(|c| c.is_ascii_alphabetic()));
        match out.last_mut() {
            Some(prev) if joins_previous => prev.push_str(word),
            _ => out.push(word.to_string()),
        }
    }
    out
}

/// A specific calendar-date instance of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub slot: Slot,
}

impl Occurrence {
    pub fn new(date: NaiveDate, slot: Slot) -> Self {
        Self { date, slot }
    }

    /// Whether the date actually falls on the slot's weekday
    pub fn is_consistent(&self) -> bool {
        ClassDay::of(self.date) == Some(self.slot.day)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.slot)
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
