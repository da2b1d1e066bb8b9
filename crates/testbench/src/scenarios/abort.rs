// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `dm-cmd running` and `dm-cmd abort` on all CPUs and threads.

use super::expect_line;
use crate::bits::BitSelector;
use crate::error::Result;
use crate::testbench::Testbench;

/// CPUs of the device under test.
pub const CPU_QUANTITY: u32 = 4;

/// All CPUs, as passed to `-c`.
const ALL_CPUS: &str = "0xf";

/// CPUs and threads aborted by [`abort_running_threads`].
const ABORT_CPUS: &str = "0x3";
const ABORT_THREADS: &str = "0xaa";

/// Threads per CPU of the firmware build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadLayout {
    Eight,
    ThirtyTwo,
}

impl ThreadLayout {
    pub fn threads(self) -> u32 {
        match self {
            ThreadLayout::Eight => 8,
            ThreadLayout::ThirtyTwo => 32,
        }
    }

    /// `running` mask with every thread started.
    pub fn all_running(self) -> &'static str {
        match self {
            ThreadLayout::Eight => "0xff",
            ThreadLayout::ThirtyTwo => "0xffffffff",
        }
    }

    /// `running` mask after aborting `0xaa`.
    pub fn after_abort(self) -> &'static str {
        match self {
            ThreadLayout::Eight => "0x55",
            ThreadLayout::ThirtyTwo => "0xffffff55",
        }
    }
}

/// How a single thread is addressed with `-t`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadNotation {
    /// Thread number, `5`
    Decimal,
    /// One-bit mask, `0x20`
    Hex,
}

impl ThreadNotation {
    pub fn format(self, thread: u32) -> String {
        match self {
            ThreadNotation::Decimal => thread.to_string(),
            ThreadNotation::Hex => format!("0x{:x}", 1u64 << thread),
        }
    }
}

/// Pattern started on `thread` of `cpu` by the `pps-all-threads-cpu{n}.dot` schedules.
///
/// Threads are lettered `a`, `b`, ... `z`, `aa`, `ab`, ...
pub fn thread_pattern(cpu: u32, thread: u32) -> String {
    let mut suffix = Vec::new();
    let mut n = thread + 1;
    while n > 0 {
        n -= 1;
        suffix.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    let suffix: String = suffix.into_iter().rev().collect();
    format!("PPS{}{}", cpu, suffix)
}

fn running_line(cpu: u32, mask: &str) -> String {
    format!("CPU {} Running Threads: {}", cpu, mask)
}

/// Query `running` on all CPUs; exactly one line per CPU, no stderr.
async fn running(bench: &Testbench, cpus: u32) -> Result<Vec<String>> {
    bench
        .stdout(
            &bench
                .dm_cmd(["-c", ALL_CPUS, "running"])
                .expect_lines(cpus as usize, 0),
        )
        .await
}

/// After a reset no thread runs on any of the `cpus` CPUs.
pub async fn reset_isolation(bench: &Testbench, cpus: u32) -> Result<()> {
    bench.reset().await?;
    let lines = running(bench, cpus).await?;
    for cpu in 0..cpus {
        expect_line(&lines, cpu as usize, &running_line(cpu, "0x0"))?;
    }
    Ok(())
}

/// Start a pattern on every thread of every CPU, abort `0xaa` on CPUs
/// `0x3`, and check both the abort report and the remaining running masks.
pub async fn abort_running_threads(bench: &Testbench, layout: ThreadLayout) -> Result<()> {
    reset_isolation(bench, CPU_QUANTITY).await?;

    let loader = bench.loader();
    for cpu in 0..CPU_QUANTITY {
        loader
            .add_schedule(&format!("pps-all-threads-cpu{}.dot", cpu))
            .await?;
    }
    for thread in 0..layout.threads() {
        let t = thread.to_string();
        for cpu in 0..CPU_QUANTITY {
            let pattern = thread_pattern(cpu, thread);
            bench
                .run(&bench.dm_cmd(["startpattern", pattern.as_str(), "-t", t.as_str()]))
                .await?;
        }
    }

    let lines = running(bench, CPU_QUANTITY).await?;
    for cpu in 0..CPU_QUANTITY {
        expect_line(&lines, cpu as usize, &running_line(cpu, layout.all_running()))?;
    }

    let cpus = BitSelector::parse(ABORT_CPUS, CPU_QUANTITY)?;
    let threads = BitSelector::parse(ABORT_THREADS, layout.threads())?;
    let lines = bench
        .stdout(
            &bench
                .dm_cmd(["-c", ABORT_CPUS, "-t", ABORT_THREADS, "abort"])
                .expect_lines(cpus.count() * threads.count(), 0),
        )
        .await?;
    let aborted = cpus
        .indices()
        .into_iter()
        .flat_map(|c| threads.indices().into_iter().map(move |t| (c, t)));
    for (index, (cpu, thread)) in aborted.enumerate() {
        expect_line(
            &lines,
            index,
            &format!("CPU {} Thread {} aborted.", cpu, thread),
        )?;
    }

    let lines = running(bench, CPU_QUANTITY).await?;
    let aborted_cpus = cpus.indices();
    for cpu in 0..CPU_QUANTITY {
        let mask = if aborted_cpus.contains(&cpu) {
            layout.after_abort()
        } else {
            layout.all_running()
        };
        expect_line(&lines, cpu as usize, &running_line(cpu, mask))?;
    }
    Ok(())
}

/// Abort one thread: exactly one stdout line, nothing on stderr.
pub async fn abort_single_thread(bench: &Testbench, cpu: u32, thread: &str) -> Result<()> {
    let cpu = cpu.to_string();
    bench
        .run(
            &bench
                .dm_cmd(["-c", cpu.as_str(), "-t", thread, "abort"])
                .expect_lines(1, 0),
        )
        .await
        .map(|_| ())
}

/// [`abort_single_thread`] for every CPU and thread of `layout`.
pub async fn abort_single_thread_all(
    bench: &Testbench,
    layout: ThreadLayout,
    notation: ThreadNotation,
) -> Result<()> {
    bench.reset().await?;
    for cpu in 0..CPU_QUANTITY {
        for thread in 0..layout.threads() {
            abort_single_thread(bench, cpu, &notation.format(thread)).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "abort_tests.rs"]
mod tests;
