// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `dm-cmd flowpattern` with relative and absolute valid times.

use crate::error::Result;
use crate::golden::CompareOptions;
use crate::testbench::Testbench;
use std::time::Duration;

const SCHEDULE: &str = "dynamic-branch-single-schedule.dot";
const ENTRY_PATTERN: &str = "IN_C0";
const TARGET_PATTERN: &str = "B";
const BRANCH_BLOCK: &str = "BLOCK_IN0";

/// Queue dumps carry a valid time that changes with every run.
const VOLATILE_FIELD: &str = "VTIME:";

const VISITED_BEFORE: &str = "dynamic-branch-single-expected-0-0.txt";
const QUEUE_PENDING: &str = "dynamic-branch-single-expected-1-1.txt";
const VISITED_AFTER: &str = "dynamic-branch-single-expected-1-3.txt";
const QUEUE_EXECUTED: &str = "dynamic-branch-single-expected-1-4.txt";

/// Valid-time flavours of the flow command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowVariant {
    /// Valid immediately
    RelativeNow,
    /// Valid one second after the command
    RelativeOneSecond,
    /// Valid at an absolute time of now
    AbsoluteNow,
    /// Valid at an absolute time one second from now
    AbsoluteOneSecond,
}

impl FlowVariant {
    pub const ALL: [FlowVariant; 4] = [
        FlowVariant::RelativeNow,
        FlowVariant::RelativeOneSecond,
        FlowVariant::AbsoluteNow,
        FlowVariant::AbsoluteOneSecond,
    ];

    /// Wait between issuing the flow command and reading the queue.
    pub fn delay(self) -> Duration {
        match self {
            // a zero delay does not leave the device time to enqueue
            FlowVariant::RelativeNow => Duration::from_millis(400),
            FlowVariant::RelativeOneSecond => Duration::from_millis(1400),
            FlowVariant::AbsoluteNow => Duration::ZERO,
            FlowVariant::AbsoluteOneSecond => Duration::from_secs(1),
        }
    }

    /// Extra `flowpattern` arguments.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            FlowVariant::RelativeNow => &[],
            FlowVariant::RelativeOneSecond => &["-l", "1000000000"],
            FlowVariant::AbsoluteNow => &["-a"],
            FlowVariant::AbsoluteOneSecond => &["-l", "1000000000", "-a"],
        }
    }

    pub async fn run(self, bench: &Testbench) -> Result<()> {
        flow_dynamic_branch(bench, self.delay(), self.options()).await
    }
}

/// Redirect `IN_C0` to `B` at `BLOCK_IN0` and check visits and queues
/// before and after the flow command executes.
pub async fn flow_dynamic_branch(bench: &Testbench, delay: Duration, options: &[&str]) -> Result<()> {
    bench.reset().await?;
    bench.loader().start_pattern(SCHEDULE, ENTRY_PATTERN).await?;

    let exact = CompareOptions::new();
    let without_vtime = CompareOptions::new().exclude_field(VOLATILE_FIELD);

    let visited = bench.stdout(&bench.dm_sched(["rawvisited"])).await?;
    bench.compare_output(&visited, VISITED_BEFORE, &exact)?;

    let mut flow = vec!["flowpattern", ENTRY_PATTERN, TARGET_PATTERN];
    flow.extend_from_slice(options);
    bench.run(&bench.dm_cmd(flow)).await?;
    if !delay.is_zero() {
        bench.delay(delay).await;
    }

    let queue = bench.stdout(&bench.dm_cmd(["rawqueue", BRANCH_BLOCK])).await?;
    bench.compare_output(&queue, QUEUE_PENDING, &without_vtime)?;

    bench
        .run(&bench.dm_cmd(["startpattern", ENTRY_PATTERN]))
        .await?;
    let visited = bench.stdout(&bench.dm_sched(["rawvisited"])).await?;
    bench.compare_output(&visited, VISITED_AFTER, &exact)?;

    let queue = bench.stdout(&bench.dm_cmd(["rawqueue", BRANCH_BLOCK])).await?;
    bench.compare_output(&queue, QUEUE_EXECUTED, &without_vtime)
}
