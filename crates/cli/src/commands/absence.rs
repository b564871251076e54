// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Absence commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use sk_core::{AbsenceRecord, StudentId};

use crate::context::CliScheduler;
use crate::output::{print_outcome, OutputFormat};

#[derive(Args)]
pub struct AbsenceArgs {
    #[command(subcommand)]
    pub command: AbsenceCommand,
}

#[derive(Subcommand)]
pub enum AbsenceCommand {
    /// Mark a student absent from their class on a date
    Request { student: String, date: NaiveDate },
    /// Withdraw an absence before the class starts
    Cancel {
        /// Absence id or unique prefix
        id: String,
    },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: AbsenceCommand,
    format: OutputFormat,
) -> Result<()> {
    let outcome = match command {
        AbsenceCommand::Request { student, date } => {
            let student = StudentId::from(student.as_str());
            scheduler.request_absence(&student, date).await?
        }
        AbsenceCommand::Cancel { id } => scheduler.cancel_absence(&id).await?,
    };
    print_outcome(&outcome, format, absence_line);
    Ok(())
}

fn absence_line(a: &AbsenceRecord) -> String {
    format!("absence {} {} {} {}", a.id, a.student, a.date, a.status.as_str())
}
