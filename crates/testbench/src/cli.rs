// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments of the `dm-testbench` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::scenarios::{ThreadLayout, ThreadNotation};
use crate::snoop::DEFAULT_VALUE_COLUMN;

/// Data master testbench
#[derive(Parser, Debug)]
#[command(name = "dm-testbench", version, about = "Black-box testbench for the data master")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "DM_TESTBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mirror every subprocess run to this JSONL file
    #[arg(long, global = true)]
    pub capture_log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the per-value frequency table of a snoop capture
    Frequency {
        csv: PathBuf,

        /// Column holding the value
        #[arg(long, default_value_t = DEFAULT_VALUE_COLUMN)]
        column: usize,

        /// Print `value count` pairs instead of the table
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Compare a result file with its golden file after normalization
    Compare {
        current: PathBuf,
        expected: PathBuf,

        /// Ignore result lines containing this text
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Decode a CPU or thread mask into bit indices
    Bits {
        mask: String,

        #[arg(long, default_value_t = 32)]
        width: u32,
    },

    /// Capture timing messages into a file
    Snoop {
        csv: PathBuf,

        /// Capture duration in seconds
        #[arg(long, default_value = "1", value_parser = parse_seconds)]
        duration: Duration,

        /// Print the frequency table afterwards
        #[arg(long)]
        analyse: bool,

        #[arg(long, default_value_t = DEFAULT_VALUE_COLUMN)]
        column: usize,
    },

    /// Run a test case against the configured device
    Scenario {
        #[arg(value_enum)]
        name: ScenarioName,

        /// Threads per CPU
        #[arg(long, value_enum, default_value = "8")]
        threads: LayoutArg,

        /// Thread addressing for `abort-single`
        #[arg(long, value_enum, default_value = "decimal")]
        notation: NotationArg,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScenarioName {
    /// No thread runs after a reset
    Reset,
    /// Start all threads, abort some
    Abort,
    /// Abort every thread one at a time
    AbortSingle,
    /// Flow command with every valid-time variant
    Flow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "32")]
    ThirtyTwo,
}

impl From<LayoutArg> for ThreadLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Eight => ThreadLayout::Eight,
            LayoutArg::ThirtyTwo => ThreadLayout::ThirtyTwo,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NotationArg {
    Decimal,
    Hex,
}

impl From<NotationArg> for ThreadNotation {
    fn from(arg: NotationArg) -> Self {
        match arg {
            NotationArg::Decimal => ThreadNotation::Decimal,
            NotationArg::Hex => ThreadNotation::Hex,
        }
    }
}

/// Non-negative, finite seconds.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s.parse().map_err(|e| format!("{}", e))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("{}", e))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
