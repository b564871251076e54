// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views: week grid, one class, one student

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use sk_core::{
    ClassStatus, OccupancyResult, Slot, StudentClass, StudentClassKind, StudentId, WeekView,
};
use std::fmt::Write;

use crate::context::CliScheduler;
use crate::output::{cell, print, OutputFormat};

#[derive(Args)]
pub struct WeekArgs {
    /// Any date in the week (defaults to today)
    pub date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct OccupancyArgs {
    /// Slot code, e.g. Tue2
    pub slot: Slot,
    /// Class date
    pub date: NaiveDate,
}

#[derive(Args)]
pub struct StudentArgs {
    pub student: String,
    /// Any date in the week (defaults to today)
    pub date: Option<NaiveDate>,
}

pub async fn week(scheduler: &CliScheduler, args: WeekArgs, format: OutputFormat) -> Result<()> {
    let date = args.date.unwrap_or_else(|| scheduler.now().date());
    let view = scheduler.get_week_view(date).await?;
    print(&view, format, week_text);
    Ok(())
}

pub async fn occupancy(
    scheduler: &CliScheduler,
    args: OccupancyArgs,
    format: OutputFormat,
) -> Result<()> {
    let result = scheduler.get_occupancy(args.slot, args.date).await?;
    print(&result, format, occupancy_text);
    Ok(())
}

pub async fn student(
    scheduler: &CliScheduler,
    args: StudentArgs,
    format: OutputFormat,
) -> Result<()> {
    let date = args.date.unwrap_or_else(|| scheduler.now().date());
    let student = StudentId::from(args.student.as_str());
    let classes = scheduler.student_week(&student, date).await?;
    print(&classes, format, |classes| student_text(&student, classes));
    Ok(())
}

fn notes(result: &OccupancyResult) -> Vec<String> {
    let mut notes = Vec::new();
    if result.status == ClassStatus::NoClass {
        notes.push("no class".to_string());
    } else if result.is_overbooked() {
        notes.push("overbooked".to_string());
    } else if result.is_full {
        notes.push("full".to_string());
    }
    if result.locked {
        notes.push("locked".to_string());
    }
    if let Some(reason) = &result.holiday {
        notes.push(format!("holiday: {}", reason));
    }
    notes
}

fn week_text(view: &WeekView) -> String {
    let mut out = format!("Week of {}\n", view.week_start);
    let _ = writeln!(
        out,
        "{} {} {} {} NOTES",
        cell("SLOT", 6),
        cell("DATE", 11),
        cell("USED", 6),
        cell("FREE", 5)
    );
    for (slot, result) in &view.cells {
        let used = format!("{}/{}", result.seats_used, result.capacity);
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            cell(&slot.to_string(), 6),
            cell(&result.occurrence.date.to_string(), 11),
            cell(&used, 6),
            cell(&result.seats_available.to_string(), 5),
            notes(result).join(", ")
        );
    }
    out
}

fn occupancy_text(result: &OccupancyResult) -> String {
    let mut out = format!(
        "{}  {}/{} seats used, {} available",
        result.occurrence, result.seats_used, result.capacity, result.seats_available
    );
    let notes = notes(result);
    if !notes.is_empty() {
        let _ = write!(out, " [{}]", notes.join(", "));
    }
    out.push('\n');

    for student in &result.attending {
        match result.reason_for(student) {
            Some(tag) => {
                let _ = writeln!(out, "  {} ({})", student, tag);
            }
            None => {
                let _ = writeln!(out, "  {}", student);
            }
        }
    }
    for (student, reason) in &result.displaced {
        let _ = writeln!(out, "  - {} ({})", student, reason.as_str());
    }
    for student in &result.pending_start {
        let _ = writeln!(out, "  . {} (not started)", student);
    }
    out
}

fn student_text(student: &StudentId, classes: &[StudentClass]) -> String {
    if classes.is_empty() {
        return format!("No classes for {}", student);
    }
    let mut out = String::new();
    for class in classes {
        let kind = match class.kind {
            StudentClassKind::Regular => "regular",
            StudentClassKind::MakeupIn => "makeup-in",
        };
        let _ = write!(out, "{}  {}", class.occurrence, kind);
        if let Some(reason) = class.displaced {
            let _ = write!(out, " (away: {})", reason.as_str());
        }
        out.push('\n');
    }
    out
}
