// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured command data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded subprocess run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureEntry {
    /// Sequence number, dense and increasing in recording order
    pub seq: u64,

    /// Wall-clock time the run was recorded
    pub timestamp: DateTime<Utc>,

    /// Milliseconds since the log was created
    pub elapsed_ms: u64,

    /// What was executed
    pub command: CommandLine,

    /// How it ended
    pub outcome: Outcome,
}

/// Program plus arguments, exactly as handed to the OS
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A command string interpreted by `sh -c`.
    pub fn shell(command: impl Into<String>) -> Self {
        Self::new("sh", ["-c".to_string(), command.into()])
    }

    /// True when any argument equals `token`.
    ///
    /// Used to find e.g. every `startpattern` call regardless of the
    /// options placed before the subcommand.
    pub fn has_arg(&self, token: &str) -> bool {
        self.args.iter().any(|a| a == token)
    }

    /// The argument following the first occurrence of `token`.
    pub fn arg_after(&self, token: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == token)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a recorded run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// The process ran to completion
    Completed {
        code: i32,
        stdout: Vec<String>,
        stderr: Vec<String>,
    },
    /// The process could not be started
    SpawnFailed { message: String },
}

impl Outcome {
    /// Return code, if the process ran at all.
    pub fn code(&self) -> Option<i32> {
        match self {
            Outcome::Completed { code, .. } => Some(*code),
            Outcome::SpawnFailed { .. } => None,
        }
    }

    /// True for a completed run with return code 0.
    pub fn is_success(&self) -> bool {
        self.code() == Some(0)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
