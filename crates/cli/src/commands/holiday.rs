// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holiday commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::context::CliScheduler;
use crate::output::{print_outcome, OutputFormat};

#[derive(Args)]
pub struct HolidayArgs {
    #[command(subcommand)]
    pub command: HolidayCommand,
}

#[derive(Subcommand)]
pub enum HolidayCommand {
    /// Close the studio on a date
    Add {
        date: NaiveDate,
        /// Shown on the week view
        #[arg(num_args = 0.., trailing_var_arg = true)]
        reason: Vec<String>,
    },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: HolidayCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        HolidayCommand::Add { date, reason } => {
            let reason = reason.join(" ");
            let outcome = scheduler.add_holiday(date, &reason).await?;
            print_outcome(&outcome, format, |h| format!("holiday {} {}", h.date, h.reason));
        }
    }
    Ok(())
}
