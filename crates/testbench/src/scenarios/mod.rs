// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test cases against a live device.
//!
//! Each scenario resets the device first, so scenarios are independent of
//! each other but must never run concurrently against the same device.

pub mod abort;
pub mod flow;

pub use abort::{
    abort_running_threads, abort_single_thread, abort_single_thread_all, reset_isolation,
    ThreadLayout, ThreadNotation, CPU_QUANTITY,
};
pub use flow::{flow_dynamic_branch, FlowVariant};

use crate::error::{Result, TestbenchError};

/// Fail unless `lines[index]` equals `expected`.
pub fn expect_line<S: AsRef<str>>(lines: &[S], index: usize, expected: &str) -> Result<()> {
    let actual: &str = lines.get(index).map(|l| l.as_ref()).unwrap_or("");
    if actual == expected {
        return Ok(());
    }
    tracing::warn!(index, expected, actual, "unexpected line");
    Err(TestbenchError::UnexpectedLine {
        index,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

#[cfg(test)]
#[path = "scenarios_tests.rs"]
mod tests;
