// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Makeup commands

use anyhow::Result;
use clap::{Args, Subcommand};
use sk_core::{MakeupRequest, Occurrence, StudentId};

use super::parse_occurrence;
use crate::context::CliScheduler;
use crate::output::{print_outcome, OutputFormat};

#[derive(Args)]
pub struct MakeupArgs {
    #[command(subcommand)]
    pub command: MakeupCommand,
}

#[derive(Subcommand)]
pub enum MakeupCommand {
    /// Move one class to another occurrence
    Request {
        student: String,
        /// Class being vacated, as SLOT@DATE
        #[arg(long, value_parser = parse_occurrence)]
        from: Occurrence,
        /// Class being joined, as SLOT@DATE
        #[arg(long, value_parser = parse_occurrence)]
        to: Occurrence,
    },
    /// Withdraw a makeup before the destination class
    Cancel {
        /// Makeup id or unique prefix
        id: String,
    },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: MakeupCommand,
    format: OutputFormat,
) -> Result<()> {
    let outcome = match command {
        MakeupCommand::Request { student, from, to } => {
            let student = StudentId::from(student.as_str());
            scheduler.request_makeup(&student, from, to).await?
        }
        MakeupCommand::Cancel { id } => scheduler.cancel_makeup(&id).await?,
    };
    print_outcome(&outcome, format, makeup_line);
    Ok(())
}

fn makeup_line(m: &MakeupRequest) -> String {
    format!(
        "makeup {} {} {} -> {} {}",
        m.id,
        m.student,
        m.original,
        m.makeup,
        m.status.as_str()
    )
}
