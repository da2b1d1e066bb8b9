// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CPU and thread selector masks (`-c` / `-t` arguments).

use crate::error::{Result, TestbenchError};
use std::fmt;
use std::str::FromStr;

/// A hexadecimal bit mask restricted to a width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitSelector {
    mask: u64,
    width: u32,
}

impl BitSelector {
    pub fn new(mask: u64, width: u32) -> Result<Self> {
        if width > 64 {
            return Err(TestbenchError::InvalidMask {
                mask: format!("{:#x}", mask),
                reason: format!("width {} exceeds 64 bits", width),
            });
        }
        Ok(Self { mask, width })
    }

    /// Parse `0xaa`, `0XAA` or `aa` as hex.
    pub fn parse(mask: &str, width: u32) -> Result<Self> {
        let digits = mask
            .strip_prefix("0x")
            .or_else(|| mask.strip_prefix("0X"))
            .unwrap_or(mask);
        let value = u64::from_str_radix(digits, 16).map_err(|e| TestbenchError::InvalidMask {
            mask: mask.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(value, width)
    }

    /// The mask with bits at or above the width cleared.
    pub fn masked(&self) -> u64 {
        if self.width >= 64 {
            self.mask
        } else {
            self.mask & ((1u64 << self.width) - 1)
        }
    }

    /// Ascending indices of the set bits below the width.
    pub fn indices(&self) -> Vec<u32> {
        let masked = self.masked();
        (0..self.width).filter(|i| masked & (1u64 << i) != 0).collect()
    }

    pub fn count(&self) -> usize {
        self.masked().count_ones() as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl fmt::Display for BitSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.masked())
    }
}

impl FromStr for BitSelector {
    type Err = TestbenchError;

    /// Full 64-bit width.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, 64)
    }
}

/// Indices of the set bits of `mask` below `width`.
pub fn list_from_bits(mask: &str, width: u32) -> Result<Vec<u32>> {
    Ok(BitSelector::parse(mask, width)?.indices())
}

/// Number of set bits of `mask` below `width`.
pub fn bit_count(mask: &str, width: u32) -> Result<usize> {
    Ok(BitSelector::parse(mask, width)?.count())
}

#[cfg(test)]
#[path = "bits_tests.rs"]
mod tests;
