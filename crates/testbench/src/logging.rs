// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber for the binary and the device test suites.

use crate::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `DM_TESTBENCH_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Filter from `DM_TESTBENCH_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn filter() -> EnvFilter {
    env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to stderr.
///
/// Later calls are no-ops, so every test may call this.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
