// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Failure taxonomy of the testbench.
//!
//! Every failure is terminal for the test case that triggered it. Nothing
//! in the testbench retries; device flakiness is handled by the fixed
//! delays chosen in the scenarios.

use dm_capture::CommandLine;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which captured stream a line-count check refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TestbenchError {
    #[error(
        "wrong return code {code}, expected: {allowed:?}, command line: {command}\nstderr: {stderr:?}\nstdout: {stdout:?}"
    )]
    UnexpectedReturnCode {
        command: CommandLine,
        code: i32,
        allowed: Vec<i32>,
        stdout: Vec<String>,
        stderr: Vec<String>,
    },

    #[error(
        "wrong {stream}, expected {expected} lines, got {actual}, command line: {command}\nstderr: {stderr:?}\nstdout: {stdout:?}"
    )]
    UnexpectedOutputShape {
        command: CommandLine,
        stream: Stream,
        expected: usize,
        actual: usize,
        stdout: Vec<String>,
        stderr: Vec<String>,
    },

    #[error("diff against {}:\n{diff}", .expected_path.display())]
    GoldenMismatch { expected_path: PathBuf, diff: String },

    #[error("required environment variable {0} is not set")]
    MissingEnvironment(&'static str),

    #[error("failed to start {command}: {source}")]
    Spawn {
        command: CommandLine,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot delete line {index}: only {len} lines left")]
    LineIndexOutOfRange { index: usize, len: usize },

    #[error("malformed capture row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("invalid bit mask '{mask}': {reason}")]
    InvalidMask { mask: String, reason: String },

    #[error("line {index}: expected '{expected}', got '{actual}'")]
    UnexpectedLine {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("normalization rule '{pattern}' -> '{replacement}' is not idempotent")]
    InvalidRule {
        pattern: String,
        replacement: String,
    },

    #[error("snoop task failed: {0}")]
    Join(String),
}

impl TestbenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TestbenchError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TestbenchError> = std::result::Result<T, E>;
