// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waitlist commands

use anyhow::Result;
use clap::{Args, Subcommand};
use sk_core::{Slot, StudentId, WaitlistRequest};

use crate::context::CliScheduler;
use crate::output::{print_outcome, OutputFormat};

#[derive(Args)]
pub struct WaitlistArgs {
    #[command(subcommand)]
    pub command: WaitlistCommand,
}

#[derive(Subcommand)]
pub enum WaitlistCommand {
    /// Queue for a permanent move from one slot into a full one
    Request {
        student: String,
        /// Slot the student attends now
        current: Slot,
        /// Full slot the student wants
        desired: Slot,
    },
    /// Take the notified seat, rewriting the roster
    Accept {
        /// Waitlist id or unique prefix
        id: String,
    },
    /// Leave the waitlist
    Cancel {
        /// Waitlist id or unique prefix
        id: String,
    },
}

pub async fn handle(
    scheduler: &CliScheduler,
    command: WaitlistCommand,
    format: OutputFormat,
) -> Result<()> {
    let outcome = match command {
        WaitlistCommand::Request {
            student,
            current,
            desired,
        } => {
            let student = StudentId::from(student.as_str());
            scheduler.request_waitlist(&student, current, desired).await?
        }
        WaitlistCommand::Accept { id } => scheduler.accept_waitlist(&id).await?,
        WaitlistCommand::Cancel { id } => scheduler.cancel_waitlist(&id).await?,
    };
    print_outcome(&outcome, format, waitlist_line);
    Ok(())
}

fn waitlist_line(w: &WaitlistRequest) -> String {
    format!(
        "waitlist {} {} {} -> {} {}",
        w.id,
        w.student,
        w.current,
        w.desired,
        w.status.as_str()
    )
}
