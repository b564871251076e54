// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use serde::Serialize;
use sk_core::Event;
use sk_engine::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print `value` as pretty JSON, or as the text `render` produces
pub fn print<T: Serialize>(value: &T, format: OutputFormat, render: impl FnOnce(&T) -> String) {
    match format {
        OutputFormat::Text => println!("{}", render(value).trim_end()),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a mutation result followed by the events it caused
pub fn print_outcome<T: Serialize>(
    outcome: &Outcome<T>,
    format: OutputFormat,
    render: impl FnOnce(&T) -> String,
) {
    print(outcome, format, |o| {
        let mut text = render(&o.value);
        text.push('\n');
        text.push_str(&events_text(&o.events));
        text
    });
}

pub fn events_text(events: &[Event]) -> String {
    events
        .iter()
        .map(|e| match e.student() {
            Some(student) => format!("  event {} ({})\n", e.name(), student),
            None => format!("  event {}\n", e.name()),
        })
        .collect()
}

/// Left-align `s` in `width` columns, cutting long values
pub fn cell(s: &str, width: usize) -> String {
    let cut: String = s.chars().take(width).collect();
    format!("{:<width$}", cut, width = width)
}
