// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capacity conflict commands

use anyhow::Result;
use clap::{Args, Subcommand};
use sk_core::ConflictRecord;

use crate::context::CliScheduler;
use crate::output::{print, print_outcome, OutputFormat};

#[derive(Args)]
pub struct ConflictArgs {
    #[command(subcommand)]
    pub command: ConflictCommand,
}

#[derive(Subcommand)]
pub enum ConflictCommand {
    /// Unresolved overbookings
    List,
    /// Mark an overbooking as handled
    Resolve {
        /// Conflict id or unique prefix
        id: String,
    },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: ConflictCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConflictCommand::List => {
            let conflicts = scheduler.list_conflicts().await?;
            print(&conflicts, format, |list| {
                if list.is_empty() {
                    return "No conflicts".to_string();
                }
                list.iter().map(|c| conflict_line(c) + "\n").collect()
            });
        }
        ConflictCommand::Resolve { id } => {
            let outcome = scheduler.resolve_conflict(&id).await?;
            print_outcome(&outcome, format, conflict_line);
        }
    }
    Ok(())
}

fn conflict_line(c: &ConflictRecord) -> String {
    let state = if c.resolved_at.is_some() { "resolved" } else { "open" };
    format!(
        "conflict {} {} {}/{} seats (cause {}) {}",
        c.id, c.occurrence, c.seats_used, c.capacity, c.cause, state
    )
}
