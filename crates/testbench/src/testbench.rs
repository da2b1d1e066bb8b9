// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite context: configuration, runner and comparator bundled with the
//! device helpers every test case uses.

use crate::config::Config;
use crate::error::{Result, TestbenchError};
use crate::golden::{CompareOptions, Comparator};
use crate::loader::{device_invocation, ScheduleLoader};
use crate::runner::{Captured, Invocation, Runner};
use crate::snoop::{FrequencyTable, Snoop};
use dm_capture::CaptureLog;
use std::path::Path;
use std::time::Duration;

/// Everything a test case needs to drive the device
#[derive(Clone, Debug)]
pub struct Testbench {
    config: Config,
    runner: Runner,
    comparator: Comparator,
}

impl Testbench {
    pub fn new(config: Config) -> Self {
        let comparator = Comparator::new(config.rules.clone());
        Self {
            config,
            runner: Runner::new(),
            comparator,
        }
    }

    /// Suite setup from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    /// Record every subprocess into `log`.
    pub fn with_log(mut self, log: CaptureLog) -> Self {
        self.runner = self.runner.with_log(log);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub fn log(&self) -> Option<&CaptureLog> {
        self.runner.log()
    }

    /// `dm-cmd <device> <args...>`
    pub fn dm_cmd<'s>(&self, args: impl IntoIterator<Item = &'s str>) -> Invocation {
        device_invocation(&self.config.dm_cmd, &self.config.datamaster, args)
    }

    /// `dm-sched <device> <args...>`
    pub fn dm_sched<'s>(&self, args: impl IntoIterator<Item = &'s str>) -> Invocation {
        device_invocation(&self.config.dm_sched, &self.config.datamaster, args)
    }

    pub async fn run(&self, invocation: &Invocation) -> Result<Captured> {
        self.runner.run(invocation).await
    }

    /// Run and keep only stdout.
    pub async fn stdout(&self, invocation: &Invocation) -> Result<Vec<String>> {
        Ok(self.run(invocation).await?.stdout)
    }

    /// Halt, clear and reset statistics in one call.
    pub async fn reset(&self) -> Result<()> {
        tracing::info!(device = %self.config.datamaster, "resetting device");
        self.run(&self.dm_cmd(["reset", "all"])).await.map(|_| ())
    }

    pub fn loader(&self) -> ScheduleLoader<'_> {
        ScheduleLoader::new(&self.config, &self.runner)
    }

    pub fn snoop(&self) -> Snoop<'_> {
        Snoop::new(&self.config, &self.runner)
    }

    /// Compare output with a file in the schedules directory.
    pub fn compare_output<S: AsRef<str>>(
        &self,
        output: &[S],
        expected_name: &str,
        options: &CompareOptions,
    ) -> Result<()> {
        self.comparator
            .compare_output(output, &self.config.schedule(expected_name), options)
    }

    pub fn compare_files(&self, current: &Path, expected: &Path, exclude: Option<&str>) -> Result<()> {
        self.comparator.compare_files(current, expected, exclude)
    }

    pub fn analyse_frequency(&self, csv: &Path, column: usize) -> Result<FrequencyTable> {
        FrequencyTable::from_csv(csv, column)
    }

    pub async fn delay(&self, duration: Duration) {
        tracing::debug!(?duration, "delay");
        tokio::time::sleep(duration).await;
    }

    /// Remove a transient file; a missing file is not an error.
    pub fn delete_file(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TestbenchError::io(path, e)),
        }
    }
}

#[cfg(test)]
#[path = "testbench_tests.rs"]
mod tests;
