// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holding commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use sk_core::{HoldingRecord, StudentId};
use sk_engine::ExtensionReport;

use crate::context::CliScheduler;
use crate::output::{print, print_outcome, OutputFormat};

#[derive(Args)]
pub struct HoldingArgs {
    #[command(subcommand)]
    pub command: HoldingCommand,
}

#[derive(Subcommand)]
pub enum HoldingCommand {
    /// Suspend all of a student's classes over a date range
    Request {
        student: String,
        /// First day held (inclusive)
        start: NaiveDate,
        /// Last day held (inclusive)
        end: NaiveDate,
    },
    /// Cancel a holding before its first class
    Cancel {
        /// Holding id or unique prefix
        id: String,
    },
    /// Enrollment extension earned by the student's active holding
    Extension { student: String },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: HoldingCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        HoldingCommand::Request {
            student,
            start,
            end,
        } => {
            let student = StudentId::from(student.as_str());
            let outcome = scheduler.request_holding(&student, start, end).await?;
            print_outcome(&outcome, format, holding_line);
        }
        HoldingCommand::Cancel { id } => {
            let outcome = scheduler.cancel_holding(&id).await?;
            print_outcome(&outcome, format, holding_line);
        }
        HoldingCommand::Extension { student } => {
            let student = StudentId::from(student.as_str());
            let report = scheduler.holding_extension(&student).await?;
            print(&report, format, extension_text);
        }
    }
    Ok(())
}

fn holding_line(h: &HoldingRecord) -> String {
    format!(
        "holding {} {} {}..{} {}",
        h.id,
        h.student,
        h.start,
        h.end,
        h.status.as_str()
    )
}

fn extension_text(report: &ExtensionReport) -> String {
    let ext = &report.extension;
    let end = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "{}\n  suppressed classes: {}\n  enrollment end: {} -> {}\n",
        holding_line(&report.holding),
        ext.suppressed,
        end(ext.enrollment_end),
        end(ext.extended_end)
    )
}
