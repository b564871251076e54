// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agreed-absence extraction from free-text roster notes
//!
//! Coaches record pre-arranged absences inside a notes column, e.g.
//! `"agreed off 2/10, 2/17 (family trip)"`. This is a weakly typed channel:
//! every date-looking token is taken, anything else is ignored. Parsing
//! happens once when roster rows are ingested.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static FULL_DATE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[-./](\d{1,2})[-./](\d{1,2})\b"));

static SHORT_DATE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})\b"));

/// Extract absence dates from a notes string
///
/// Short `M/D` dates take the year of `reference` (usually the enrollment
/// start); dates that would fall before `reference` roll into the next year.
/// Impossible dates such as `2/30` are dropped.
pub fn parse_agreed_absences(notes: &str, reference: NaiveDate) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();
    let mut remainder = notes.to_string();

    if let Ok(re) = FULL_DATE.as_ref() {
        for caps in re.captures_iter(notes) {
            let ymd = (
                caps[1].parse::<i32>(),
                caps[2].parse::<u32>(),
                caps[3].parse::<u32>(),
            );
            if let (Ok(y), Ok(m), Ok(d)) = ymd {
                if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                    dates.insert(date);
                }
            }
        }
        remainder = re.replace_all(notes, " ").into_owned();
    }

    if let Ok(re) = SHORT_DATE.as_ref() {
        for caps in re.captures_iter(&remainder) {
            let md = (caps[1].parse::<u32>(), caps[2].parse::<u32>());
            if let (Ok(m), Ok(d)) = md {
                if let Some(date) = infer_year(m, d, reference) {
                    dates.insert(date);
                }
            }
        }
    }

    dates
}

fn infer_year(month: u32, day: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let same_year = NaiveDate::from_ymd_opt(reference.year(), month, day)?;
    if same_year >= reference {
        Some(same_year)
    } else {
        NaiveDate::from_ymd_opt(reference.year() + 1, month, day)
    }
}
