// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Data master testbench binary entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use dm_testbench::bits::BitSelector;
use dm_testbench::capture::CaptureLog;
use dm_testbench::cli::{Cli, Command, ScenarioName};
use dm_testbench::config::{Config, ConfigFile};
use dm_testbench::golden::Comparator;
use dm_testbench::scenarios::{self, FlowVariant, CPU_QUANTITY};
use dm_testbench::snoop::FrequencyTable;
use dm_testbench::{logging, Testbench, TestbenchError};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let exit_code = run(cli).await?;
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Frequency { csv, column, quiet } => {
            let table = FrequencyTable::from_csv(&csv, column)?;
            if quiet {
                for (value, count) in table.counts() {
                    println!("{} {}", value, count);
                }
            } else {
                println!();
                print!("{}", table.render());
            }
            Ok(0)
        }
        Command::Compare {
            current,
            expected,
            exclude,
        } => {
            let rules = match cli.config {
                Some(ref path) => ConfigFile::load(path)?.rules()?,
                None => dm_testbench::normalize::RuleSet::painted_nodes(),
            };
            match Comparator::new(rules).compare_files(&current, &expected, exclude.as_deref()) {
                Ok(()) => Ok(0),
                Err(TestbenchError::GoldenMismatch { diff, .. }) => {
                    print!("{}", diff);
                    Ok(1)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Bits { mask, width } => {
            let selector = BitSelector::parse(&mask, width)?;
            let indices: Vec<String> = selector.indices().iter().map(u32::to_string).collect();
            println!("{}", indices.join(" "));
            Ok(0)
        }
        Command::Snoop {
            csv,
            duration,
            analyse,
            column,
        } => {
            let (bench, _log) = bench(cli.config.as_deref(), cli.capture_log.as_deref())?;
            bench.snoop().to_csv(&csv, duration).await?;
            if analyse {
                let table = bench.analyse_frequency(&csv, column)?;
                println!();
                print!("{}", table.render());
            }
            Ok(0)
        }
        Command::Scenario {
            name,
            threads,
            notation,
        } => {
            let (bench, log) = bench(cli.config.as_deref(), cli.capture_log.as_deref())?;
            let result = match name {
                ScenarioName::Reset => scenarios::reset_isolation(&bench, CPU_QUANTITY).await,
                ScenarioName::Abort => scenarios::abort_running_threads(&bench, threads.into()).await,
                ScenarioName::AbortSingle => {
                    scenarios::abort_single_thread_all(&bench, threads.into(), notation.into()).await
                }
                ScenarioName::Flow => run_flow_variants(&bench).await,
            };
            match result {
                Ok(()) => {
                    println!("ok");
                    Ok(0)
                }
                Err(e) => {
                    eprint!("{}", log.transcript());
                    eprintln!("FAILED: {}", e);
                    Ok(1)
                }
            }
        }
    }
}

async fn run_flow_variants(bench: &Testbench) -> dm_testbench::Result<()> {
    for variant in FlowVariant::ALL {
        tracing::info!(?variant, "flow variant");
        variant.run(bench).await?;
    }
    Ok(())
}

fn bench(config: Option<&Path>, capture_log: Option<&Path>) -> Result<(Testbench, CaptureLog)> {
    let config = match config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    let log = match capture_log {
        Some(path) => CaptureLog::with_file(path)
            .with_context(|| format!("cannot create capture log {}", path.display()))?,
        None => CaptureLog::new(),
    };
    Ok((Testbench::new(config).with_log(log.clone()), log))
}
