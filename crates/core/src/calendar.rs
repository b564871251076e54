// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar arithmetic over class weeks

use crate::slot::ClassDay;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeSet;

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Monday through Friday of the week containing `date`
pub fn class_week(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = week_start(date);
    (0..5)
        .filter_map(|i| monday.checked_add_days(Days::new(i)))
        .collect()
}

/// Dates in `[from, to]` falling on one of `days`
pub fn class_dates(from: NaiveDate, to: NaiveDate, days: &BTreeSet<ClassDay>) -> Vec<NaiveDate> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| ClassDay::of(*d).is_some_and(|day| days.contains(&day)))
        .collect()
}

/// Push an enrollment end date forward by `count` class meetings
///
/// Meetings are counted on the student's class days after `end`, skipping
/// holidays. With no class days the end date is returned unchanged.
pub fn extend_enrollment_end(
    end: NaiveDate,
    days: &BTreeSet<ClassDay>,
    count: u32,
    is_holiday: impl Fn(NaiveDate) -> bool,
) -> NaiveDate {
    if days.is_empty() || count == 0 {
        return end;
    }
    let mut remaining = count;
    let mut last = end;
    for date in end.iter_days().skip(1) {
        let meets = ClassDay::of(date).is_some_and(|day| days.contains(&day));
        if meets && !is_holiday(date) {
            last = date;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
    }
    last
}
