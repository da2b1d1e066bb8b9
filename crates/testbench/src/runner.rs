// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with return-code and output-shape checks.

use crate::error::{Result, Stream, TestbenchError};
use dm_capture::{CaptureLog, CommandLine, Outcome};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// One command to run, with what counts as success
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command: CommandLine,

    /// Acceptable return codes (default `[0]`)
    pub allowed_codes: Vec<i32>,

    /// Exact number of stdout lines, if checked
    pub stdout_lines: Option<usize>,

    /// Exact number of stderr lines, if checked
    pub stderr_lines: Option<usize>,
}

impl Invocation {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: CommandLine::new(program, args),
            allowed_codes: vec![0],
            stdout_lines: None,
            stderr_lines: None,
        }
    }

    /// Set the acceptable return codes
    pub fn with_allowed_codes(mut self, codes: impl Into<Vec<i32>>) -> Self {
        self.allowed_codes = codes.into();
        self
    }

    /// Require exactly `n` stdout lines
    pub fn expect_stdout_lines(mut self, n: usize) -> Self {
        self.stdout_lines = Some(n);
        self
    }

    /// Require exactly `n` stderr lines
    pub fn expect_stderr_lines(mut self, n: usize) -> Self {
        self.stderr_lines = Some(n);
        self
    }

    /// Require exactly `stdout` and `stderr` lines
    pub fn expect_lines(self, stdout: usize, stderr: usize) -> Self {
        self.expect_stdout_lines(stdout).expect_stderr_lines(stderr)
    }

    /// Check a completed run against the expectations.
    pub fn check(&self, captured: &Captured) -> Result<()> {
        if !self.allowed_codes.contains(&captured.code) {
            return Err(TestbenchError::UnexpectedReturnCode {
                command: self.command.clone(),
                code: captured.code,
                allowed: self.allowed_codes.clone(),
                stdout: captured.stdout.clone(),
                stderr: captured.stderr.clone(),
            });
        }
        let shapes = [
            (Stream::Stderr, self.stderr_lines, captured.stderr.len()),
            (Stream::Stdout, self.stdout_lines, captured.stdout.len()),
        ];
        for (stream, expected, actual) in shapes {
            if let Some(expected) = expected {
                if expected != actual {
                    return Err(TestbenchError::UnexpectedOutputShape {
                        command: self.command.clone(),
                        stream,
                        expected,
                        actual,
                        stdout: captured.stdout.clone(),
                        stderr: captured.stderr.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Output of a finished process
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub code: i32,
}

impl Captured {
    fn from_output(stdout: &[u8], stderr: &[u8], status: ExitStatus) -> Self {
        Self {
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
            code: return_code(status),
        }
    }

    fn outcome(&self) -> Outcome {
        Outcome::Completed {
            code: self.code,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

/// A shell command started with its stdout going to a file
#[derive(Debug)]
pub struct ShellChild {
    invocation: Invocation,
    child: Child,
}

/// Runs invocations and optionally records them
#[derive(Clone, Debug, Default)]
pub struct Runner {
    log: Option<CaptureLog>,
}

impl Runner {
    pub fn new() -> Self {
        Self { log: None }
    }

    /// Record every run into `log`.
    pub fn with_log(mut self, log: CaptureLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn log(&self) -> Option<&CaptureLog> {
        self.log.as_ref()
    }

    /// Run to completion, capture both streams, check the expectations.
    pub async fn run(&self, invocation: &Invocation) -> Result<Captured> {
        let command = &invocation.command;
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_failed(command, source))?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| self.spawn_failed(command, source))?;

        let captured = Captured::from_output(&output.stdout, &output.stderr, output.status);
        self.record(command, captured.outcome());
        tracing::debug!(
            command = %command,
            code = captured.code,
            stdout_lines = captured.stdout.len(),
            stderr_lines = captured.stderr.len(),
            "subprocess finished"
        );

        if let Err(e) = invocation.check(&captured) {
            tracing::warn!(command = %command, "{}", e);
            return Err(e);
        }
        Ok(captured)
    }

    /// Run a command string through `sh -c` with stdout redirected to `stdout_path`.
    ///
    /// Only the return code is checked; stderr is captured for the report.
    pub async fn run_shell_to_file(
        &self,
        command_string: &str,
        stdout_path: &Path,
        allowed_codes: &[i32],
    ) -> Result<Captured> {
        let child = self.spawn_shell_to_file(command_string, stdout_path, allowed_codes)?;
        self.wait_shell(child).await
    }

    /// Start a shell command like `run_shell_to_file` without waiting for it.
    ///
    /// The process is running when this returns.
    pub fn spawn_shell_to_file(
        &self,
        command_string: &str,
        stdout_path: &Path,
        allowed_codes: &[i32],
    ) -> Result<ShellChild> {
        let command = CommandLine::shell(command_string);
        let file =
            std::fs::File::create(stdout_path).map_err(|e| TestbenchError::io(stdout_path, e))?;

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_failed(&command, source))?;

        Ok(ShellChild {
            invocation: Invocation {
                command,
                allowed_codes: allowed_codes.to_vec(),
                stdout_lines: None,
                stderr_lines: None,
            },
            child,
        })
    }

    /// Wait for a started shell command and check its return code.
    pub async fn wait_shell(&self, shell: ShellChild) -> Result<Captured> {
        let ShellChild { invocation, child } = shell;
        let command = &invocation.command;
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| self.spawn_failed(command, source))?;

        let captured = Captured::from_output(&[], &output.stderr, output.status);
        self.record(command, captured.outcome());
        tracing::debug!(command = %command, code = captured.code, "shell command finished");

        invocation.check(&captured)?;
        Ok(captured)
    }

    fn spawn_failed(&self, command: &CommandLine, source: std::io::Error) -> TestbenchError {
        self.record(
            command,
            Outcome::SpawnFailed {
                message: source.to_string(),
            },
        );
        tracing::warn!(command = %command, error = %source, "failed to start subprocess");
        TestbenchError::Spawn {
            command: command.clone(),
            source,
        }
    }

    fn record(&self, command: &CommandLine, outcome: Outcome) {
        if let Some(ref log) = self.log {
            log.record(command.clone(), outcome);
        }
    }
}

/// Characters ending a line besides `\n` and `\r`.
const LINE_BREAKS: &[char] = &[
    '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Decode lossily and split into lines; no trailing empty line.
///
/// `\r\n` is one break. A lone `\r`, vertical tab, form feed, the file,
/// group and record separators, NEL and the Unicode line and paragraph
/// separators each end a line too.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            c if LINE_BREAKS.contains(&c) => lines.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(unix)]
fn return_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => -signal,
        (None, None) => -1,
    }
}

#[cfg(not(unix))]
fn return_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
