// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Timing message capture and its frequency analysis.

pub mod capture;
pub mod frequency;

pub use capture::{snoop_command, Snoop};
pub use frequency::{parse_timestamp, FrequencyTable, DEFAULT_VALUE_COLUMN};
