//! Shared helpers for CLI specs

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Monday of the week most specs run in
pub const MONDAY_MORNING: &str = "2026-02-09T08:00";

/// alice and bob on Tue2, carol on Thu4
pub const SMALL_ROSTER: &str = r#"[
    {"student": "alice", "schedule": "Tue2", "start": "2026-01-05", "end": "2026-06-30"},
    {"student": "bob", "schedule": "Tue2", "start": "2026-01-05", "end": "2026-06-30"},
    {"student": "carol", "schedule": "Thu4", "start": "2026-01-05", "end": "2026-06-30"}
]"#;

/// Roster rows for `count` students (`s1`, `s2`, ...) all on `code`
pub fn full_slot_rows(code: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| {
            format!(
                r#"{{"student": "s{n}", "schedule": "{code}", "start": "2026-01-05", "end": "2026-06-30"}}"#
            )
        })
        .collect()
}

/// A temporary data directory for one test
pub struct Studio {
    dir: TempDir,
}

impl Studio {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn with_roster(json: &str) -> Self {
        let studio = Self::empty();
        studio.file("roster.json", json);
        studio
    }

    /// Roster built from row literals
    pub fn with_rows(rows: &[String]) -> Self {
        Self::with_roster(&format!("[{}]", rows.join(",\n")))
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).unwrap();
    }

    /// `sk` pointed at this studio, with the clock pinned to Monday morning
    pub fn sk(&self) -> Sk {
        self.sk_at(MONDAY_MORNING)
    }

    pub fn sk_at(&self, now: &str) -> Sk {
        let mut cmd = Command::cargo_bin("sk").unwrap();
        cmd.env_remove("RUST_LOG")
            .arg("--data")
            .arg(self.path())
            .arg("--now")
            .arg(now);
        Sk { cmd }
    }
}

pub struct Sk {
    cmd: Command,
}

impl Sk {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn json(mut self) -> Self {
        self.cmd.args(["--format", "json"]);
        self
    }

    /// Run and require exit status 0
    pub fn passes(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            run.output.status.code(),
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require the given non-zero exit status
    pub fn fails_with(mut self, code: i32) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "stdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct Run {
    output: std::process::Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout lacks {needle:?}:\n{stdout}");
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(needle), "stdout has {needle:?}:\n{stdout}");
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr lacks {needle:?}:\n{stderr}");
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}

/// Id of the record a `--format json` mutation returned
pub fn created_id(run: &Run) -> String {
    run.json()["value"]["id"].as_str().unwrap().to_string()
}
