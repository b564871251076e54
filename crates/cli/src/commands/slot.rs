// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coach slot controls

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use sk_core::{Slot, SlotFlags};

use crate::context::CliScheduler;
use crate::output::{print_outcome, OutputFormat};

#[derive(Args)]
pub struct SlotArgs {
    #[command(subcommand)]
    pub command: SlotCommand,
}

#[derive(Subcommand)]
pub enum SlotCommand {
    /// Cancel a slot outright, or restore it if already cancelled
    ToggleDisabled { slot: Slot },
    /// Block makeups into one date of a slot, or lift that block
    ToggleLock { slot: Slot, date: NaiveDate },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: SlotCommand,
    format: OutputFormat,
) -> Result<()> {
    let (slot, outcome) = match command {
        SlotCommand::ToggleDisabled { slot } => {
            (slot, scheduler.toggle_slot_disabled(slot).await?)
        }
        SlotCommand::ToggleLock { slot, date } => {
            (slot, scheduler.toggle_slot_locked(slot, date).await?)
        }
    };
    print_outcome(&outcome, format, |flags| flags_line(slot, flags));
    Ok(())
}

fn flags_line(slot: Slot, flags: &SlotFlags) -> String {
    let state = if flags.disabled { "disabled" } else { "enabled" };
    match flags.locked_on {
        Some(date) => format!("slot {} {}, locked on {}", slot, state, date),
        None => format!("slot {} {}", slot, state),
    }
}
