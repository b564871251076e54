// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sk - Seatkeeper CLI

mod clock;
mod commands;
mod context;
mod error;
mod output;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use commands::{absence, conflict, holding, holiday, makeup, slot, view, waitlist};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::clock::CliClock;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "sk",
    version,
    about = "Seatkeeper - class seat occupancy and rescheduling"
)]
struct Cli {
    /// Directory holding roster.json, overlay.wal and an optional seatkeeper.toml
    #[arg(long, global = true, env = "SK_DATA", default_value = ".")]
    data: PathBuf,

    /// Act as if the local time were this (YYYY-MM-DDTHH:MM)
    #[arg(long, global = true, value_parser = clock::parse_now)]
    now: Option<NaiveDateTime>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Occupancy of every slot in one class week
    Week(view::WeekArgs),
    /// Who attends one class
    Occupancy(view::OccupancyArgs),
    /// A student's own classes for one week
    Student(view::StudentArgs),
    /// Bounded suspensions of all of a student's classes
    Holding(holding::HoldingArgs),
    /// Single-date absences
    Absence(absence::AbsenceArgs),
    /// One-time moves to another class
    Makeup(makeup::MakeupArgs),
    /// Queue for a permanent move into a full slot
    Waitlist(waitlist::WaitlistArgs),
    /// Coach controls for a slot
    Slot(slot::SlotArgs),
    /// Studio closures
    Holiday(holiday::HolidayArgs),
    /// Capacity conflicts found after commits
    Conflict(conflict::ConflictArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    let format = cli.format;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => error::report(&e, format),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let clock = CliClock::from_override(cli.now);
    let scheduler = context::open(&cli.data, clock)?;
    let format = cli.format;

    match cli.command {
        Commands::Week(args) => view::week(&scheduler, args, format).await,
        Commands::Occupancy(args) => view::occupancy(&scheduler, args, format).await,
        Commands::Student(args) => view::student(&scheduler, args, format).await,
        Commands::Holding(args) => holding::handle(&scheduler, args.command, format).await,
        Commands::Absence(args) => absence::handle(&scheduler, args.command, format).await,
        Commands::Makeup(args) => makeup::handle(&scheduler, args.command, format).await,
        Commands::Waitlist(args) => waitlist::handle(&scheduler, args.command, format).await,
        Commands::Slot(args) => slot::handle(&scheduler, args.command, format).await,
        Commands::Holiday(args) => holiday::handle(&scheduler, args.command, format).await,
        Commands::Conflict(args) => conflict::handle(&scheduler, args.command, format).await,
    }
}

/// Log to stderr so stdout stays parseable; `RUST_LOG` overrides the level
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
