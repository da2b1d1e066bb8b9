// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Snoop capture, alone or alongside a foreground action.

use crate::config::Config;
use crate::error::{Result, TestbenchError};
use crate::runner::Runner;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Append the capture duration in seconds to the snoop template.
///
/// A template wrapped for `sh -c '...'` keeps the duration inside the
/// closing quote.
pub fn snoop_command(template: &str, duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    match template.strip_suffix('\'') {
        Some(quoted) => format!("{} {}'", quoted, seconds),
        None => format!("{} {}", template, seconds),
    }
}

/// Snoop runs for the configured device
pub struct Snoop<'a> {
    config: &'a Config,
    runner: &'a Runner,
}

impl<'a> Snoop<'a> {
    pub fn new(config: &'a Config, runner: &'a Runner) -> Self {
        Self { config, runner }
    }

    pub fn command(&self, duration: Duration) -> String {
        snoop_command(&self.config.snoop_command, duration)
    }

    /// Capture for `duration` with stdout written to `csv`.
    pub async fn to_csv(&self, csv: &Path, duration: Duration) -> Result<()> {
        let command = self.command(duration);
        tracing::info!(command = %command, file = %csv.display(), "snoop started");
        self.runner.run_shell_to_file(&command, csv, &[0]).await?;
        tracing::info!(file = %csv.display(), "snoop finished");
        Ok(())
    }

    /// Capture into `csv` while `action` runs.
    ///
    /// The snoop process is started before the action, its exit is awaited
    /// on a separate task while the action runs on the calling one. The
    /// action must finish inside the capture window; nothing enforces that.
    /// An action error is returned only after the capture has finished.
    pub async fn with_action<F, Fut, T>(&self, csv: &Path, duration: Duration, action: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let command = self.command(duration);
        let child = self.runner.spawn_shell_to_file(&command, csv, &[0])?;
        tracing::info!(command = %command, file = %csv.display(), "snoop started");

        let runner = self.runner.clone();
        let capture = tokio::spawn(async move { runner.wait_shell(child).await });

        let result = action().await;

        capture
            .await
            .map_err(|e| TestbenchError::Join(e.to_string()))??;
        tracing::info!(file = %csv.display(), "snoop finished");
        result
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
