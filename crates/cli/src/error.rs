// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing error display with context, suggestions and exit codes

use serde::Serialize;
use sk_engine::ScheduleError;
use std::fmt;
use std::process::ExitCode;

use crate::output::OutputFormat;

/// Error with context and recovery suggestions for display
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Explain a scheduler failure in coach terms
    pub fn from_schedule(err: &ScheduleError) -> Self {
        let base = CliError::new(err.to_string());
        match err {
            ScheduleError::ValidationFailed(_) => {
                let predicate = err.predicate().unwrap_or("policy");
                let base = base.with_context(format!("failed check: {}", predicate));
                match predicate {
                    "CapacityOK" => base
                        .with_suggestion("Pick another class: sk week")
                        .with_suggestion("For a permanent move, join the waitlist: sk waitlist request"),
                    "TimeCutoffOK" | "AlreadyStarted" => {
                        base.with_suggestion("Check the current time, or pass --now when replaying")
                    }
                    "SlotUnlocked" => base.with_suggestion("A coach can lift the lock: sk slot toggle-lock"),
                    _ => base,
                }
            }
            ScheduleError::NotFound { .. } => base
                .with_context("Ids may be shortened to any unique prefix")
                .with_suggestion("Check the id printed when the request was made"),
            ScheduleError::AlreadyTerminal { .. } => {
                base.with_context("Finished requests cannot change state again")
            }
            ScheduleError::CapacityConflict { .. } => base
                .with_context("Another change to the same class landed first")
                .with_suggestion("Re-check occupancy and try again: sk occupancy"),
            ScheduleError::UpstreamUnavailable(_) => base
                .with_context("The call was retried once before giving up")
                .with_suggestion("Check that the data directory is readable and writable"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Process exit status for each failure kind
///
/// 2 is left to clap for usage errors.
pub fn exit_code(err: &ScheduleError) -> u8 {
    match err {
        ScheduleError::ValidationFailed(_) => 3,
        ScheduleError::NotFound { .. } => 4,
        ScheduleError::AlreadyTerminal { .. } => 5,
        ScheduleError::CapacityConflict { .. } => 6,
        ScheduleError::UpstreamUnavailable(_) => 7,
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    predicate: Option<&'a str>,
    message: String,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    error: ErrorBody<'a>,
}

/// Print `err` and pick the exit status
///
/// With `--format json` the error goes to stdout as an object so scripts
/// read one stream; text goes to stderr.
pub fn report(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let schedule = err.downcast_ref::<ScheduleError>();
    let code = schedule.map_or(1, exit_code);

    match format {
        OutputFormat::Json => {
            let body = ErrorBody {
                kind: schedule.map_or("error", ScheduleError::kind),
                predicate: schedule.and_then(ScheduleError::predicate),
                message: format!("{:#}", err),
            };
            if let Ok(json) = serde_json::to_string_pretty(&ErrorReport { error: body }) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => match schedule {
            Some(e) => eprint!("{}", CliError::from_schedule(e)),
            None => eprintln!("error: {:#}", err),
        },
    }
    ExitCode::from(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_context_and_numbered_suggestions() {
        let err = CliError::new("Something went wrong")
            .with_context("First context")
            .with_suggestion("Try this")
            .with_suggestion("Or this");

        let output = err.to_string();
        assert!(output.contains("error: Something went wrong"));
        assert!(output.contains("-> First context"));
        assert!(output.contains("1. Try this"));
        assert!(output.contains("2. Or this"));
    }

    #[test]
    fn not_found_mentions_prefixes() {
        let err = ScheduleError::NotFound {
            kind: "makeup".into(),
            id: "mk-9".into(),
        };
        let output = CliError::from_schedule(&err).to_string();
        assert!(output.contains("makeup mk-9 not found"));
        assert!(output.contains("unique prefix"));
        assert_eq!(exit_code(&err), 4);
    }

    #[test]
    fn capacity_conflict_suggests_rechecking() {
        let err = ScheduleError::CapacityConflict {
            target: "2026-02-10 Tue2".into(),
            detail: "generation moved".into(),
        };
        let output = CliError::from_schedule(&err).to_string();
        assert!(output.contains("sk occupancy"));
        assert_eq!(exit_code(&err), 6);
    }
}
