// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess capture records for the data master testbench.
//!
//! Every external command the testbench runs (`dm-cmd`, `dm-sched`, the
//! snoop shell command) can be recorded into a [`CaptureLog`]. Tests use
//! the log to assert which commands were issued and in what order, and
//! failure reports use it to show the command history leading up to a
//! mismatch.

mod entry;
mod log;

pub use entry::{CaptureEntry, CommandLine, Outcome};
pub use log::CaptureLog;
