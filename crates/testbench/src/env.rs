// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by the testbench are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::path::PathBuf;

/// `DATAMASTER`: device identifier passed as first argument to both binaries.
pub fn datamaster() -> Option<String> {
    non_empty(names::DATAMASTER)
}

/// `TEST_BINARY_DM_CMD`: command binary. Default `dm-cmd`.
pub fn dm_cmd() -> Option<String> {
    non_empty(names::TEST_BINARY_DM_CMD)
}

/// `TEST_BINARY_DM_SCHED`: scheduler binary. Default `dm-sched`.
pub fn dm_sched() -> Option<String> {
    non_empty(names::TEST_BINARY_DM_SCHED)
}

/// `TEST_SCHEDULES`: schedules and expected-result directory. Default `schedules/`.
pub fn schedules_dir() -> Option<PathBuf> {
    non_empty(names::TEST_SCHEDULES).map(PathBuf::from)
}

/// `SNOOP_COMMAND`: snoop shell command without the duration argument.
pub fn snoop_command() -> Option<String> {
    non_empty(names::SNOOP_COMMAND)
}

/// `DM_TESTBENCH_CONFIG`: optional TOML configuration file.
pub fn config_file() -> Option<PathBuf> {
    non_empty(names::DM_TESTBENCH_CONFIG).map(PathBuf::from)
}

/// `DM_TESTBENCH_LOG`: tracing filter directive, e.g. `dm_testbench=debug`.
pub fn log_filter() -> Option<String> {
    non_empty(names::DM_TESTBENCH_LOG)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
