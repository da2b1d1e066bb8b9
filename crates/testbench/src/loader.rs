// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Loading schedules and starting patterns.

use crate::config::Config;
use crate::error::Result;
use crate::runner::{Invocation, Runner};

/// Marker of the pattern section in the `dm-sched <device>` listing.
pub const PATTERNS_HEADER: &str = "Patterns";

/// Where the listing parser is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingState {
    BeforeHeader,
    InSection,
}

/// Pattern names from the `dm-sched <device>` listing.
///
/// Before the header nothing is yielded. The header line itself (any line
/// containing `Patterns`) yields nothing and enters the section. Inside
/// the section every line with a whitespace-delimited token yields that
/// first token; blank lines are skipped. The section is never left again,
/// so a later line containing `Patterns` is treated like any other line.
pub struct PatternListing<I> {
    lines: I,
    state: ListingState,
}

impl<I> PatternListing<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            state: ListingState::BeforeHeader,
        }
    }

    pub fn state(&self) -> ListingState {
        self.state
    }
}

impl<I, S> Iterator for PatternListing<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for line in self.lines.by_ref() {
            let line = line.as_ref();
            match self.state {
                ListingState::BeforeHeader => {
                    if line.contains(PATTERNS_HEADER) {
                        self.state = ListingState::InSection;
                    }
                }
                ListingState::InSection => {
                    if let Some(name) = line.split_whitespace().next() {
                        return Some(name.to_string());
                    }
                }
            }
        }
        None
    }
}

/// Pattern names in listing order.
pub fn pattern_names<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    PatternListing::new(lines.iter()).collect()
}

/// Which patterns to start after adding a schedule
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Start {
    /// Only add the schedule
    Nothing,
    /// Start the named pattern
    Named(String),
    /// Start the first pattern of the listing
    First,
    /// Start every pattern of the listing
    All,
}

/// Schedule operations against the configured device
pub struct ScheduleLoader<'a> {
    config: &'a Config,
    runner: &'a Runner,
}

impl<'a> ScheduleLoader<'a> {
    pub fn new(config: &'a Config, runner: &'a Runner) -> Self {
        Self { config, runner }
    }

    /// Add `schedule_file` (relative to the schedules directory) without starting anything.
    pub async fn add_schedule(&self, schedule_file: &str) -> Result<()> {
        self.load(schedule_file, Start::Nothing).await.map(|_| ())
    }

    /// Add `schedule_file`, then start `pattern`.
    pub async fn start_pattern(&self, schedule_file: &str, pattern: &str) -> Result<()> {
        self.load(schedule_file, Start::Named(pattern.to_string()))
            .await
            .map(|_| ())
    }

    /// Add `schedule_file`, then start the first listed pattern.
    pub async fn start_first_pattern(&self, schedule_file: &str) -> Result<Vec<String>> {
        self.load(schedule_file, Start::First).await
    }

    /// Add `schedule_file`, then start every listed pattern.
    pub async fn start_all_patterns(&self, schedule_file: &str) -> Result<Vec<String>> {
        self.load(schedule_file, Start::All).await
    }

    /// Add a schedule and start patterns; returns the names started.
    pub async fn load(&self, schedule_file: &str, start: Start) -> Result<Vec<String>> {
        let path = self
            .config
            .schedule(schedule_file)
            .to_string_lossy()
            .into_owned();
        tracing::info!(
            device = %self.config.datamaster,
            schedule = %path,
            "adding schedule"
        );
        self.runner
            .run(&self.dm_sched(["add", path.as_str()]))
            .await?;

        let names = match &start {
            Start::Nothing => return Ok(Vec::new()),
            Start::Named(name) => vec![name.clone()],
            Start::First | Start::All => {
                let listing = self
                    .runner
                    .run(&Invocation::new(
                        &self.config.dm_sched,
                        [self.config.datamaster.as_str()],
                    ))
                    .await?;
                let names = PatternListing::new(listing.stdout.iter());
                if start == Start::First {
                    names.take(1).collect()
                } else {
                    names.collect()
                }
            }
        };

        for name in &names {
            tracing::info!(pattern = %name, "starting pattern");
            self.runner
                .run(&self.dm_cmd(["startpattern", name.as_str()]))
                .await?;
        }
        Ok(names)
    }

    fn dm_cmd<'s>(&self, args: impl IntoIterator<Item = &'s str>) -> Invocation {
        device_invocation(&self.config.dm_cmd, &self.config.datamaster, args)
    }

    fn dm_sched<'s>(&self, args: impl IntoIterator<Item = &'s str>) -> Invocation {
        device_invocation(&self.config.dm_sched, &self.config.datamaster, args)
    }
}

/// `<binary> <device> <args...>`
pub fn device_invocation<'s>(
    binary: &str,
    device: &str,
    args: impl IntoIterator<Item = &'s str>,
) -> Invocation {
    let mut argv = vec![device.to_string()];
    argv.extend(args.into_iter().map(str::to_string));
    Invocation::new(binary, argv)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
