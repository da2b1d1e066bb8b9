// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Data master testbench
//!
//! Drives the data master through `dm-cmd` and `dm-sched`, captures their
//! output and checks it against golden files.
//!
#![doc = include_str!("../README.md")]

/// Re-exported capture types from the dm-capture crate.
pub mod capture {
    pub use dm_capture::{CaptureEntry, CaptureLog, CommandLine, Outcome};
}

pub mod bits;
#[doc(hidden)]
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod golden;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod runner;
pub mod scenarios;
pub mod snoop;
pub mod testbench;

pub use config::Config;
pub use error::{Result, TestbenchError};
pub use testbench::Testbench;
