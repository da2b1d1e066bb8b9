// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite configuration.
//!
//! Built once at suite start from the environment, optionally layered on
//! top of a TOML file, then passed by reference into every component.
//! Environment values win over file values.
//!
//! ```toml
//! datamaster = "tcp/scuxl4711.acc.gsi.de"
//! dm_cmd = "/usr/bin/dm-cmd"
//! schedules_dir = "schedules/"
//!
//! [[normalize]]
//! pattern = 'flags="0x00000207"'
//! replacement = 'flags="0x00000007"'
//! ```

use crate::env;
use crate::error::{Result, TestbenchError};
use crate::normalize::{Rule, RuleSet};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DM_CMD: &str = "dm-cmd";
pub const DEFAULT_DM_SCHED: &str = "dm-sched";
pub const DEFAULT_SCHEDULES_DIR: &str = "schedules/";
pub const DEFAULT_SNOOP_COMMAND: &str = "saft-ctl tr0 -xv snoop 0 0 0";

/// On-disk configuration; every field optional
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub datamaster: Option<String>,
    pub dm_cmd: Option<String>,
    pub dm_sched: Option<String>,
    pub schedules_dir: Option<PathBuf>,
    pub snoop_command: Option<String>,
    #[serde(default)]
    pub normalize: Vec<RuleEntry>,
}

/// Extra normalization rule from the config file
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl ConfigFile {
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| TestbenchError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source =
            std::fs::read_to_string(path).map_err(|e| TestbenchError::io(path, e))?;
        Self::parse(&source)
    }

    /// The painted-node rules followed by the file's extra rules.
    pub fn rules(&self) -> Result<RuleSet> {
        self.normalize
            .iter()
            .try_fold(RuleSet::painted_nodes(), |rules, entry| {
                rules.with_rule(Rule::new(entry.pattern.clone(), entry.replacement.clone()))
            })
    }
}

/// Immutable suite configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub dm_cmd: String,
    pub dm_sched: String,
    pub datamaster: String,
    pub schedules_dir: PathBuf,
    pub snoop_command: String,
    pub rules: RuleSet,
}

impl Config {
    /// Configuration for `datamaster` with every other field at its default.
    pub fn new(datamaster: impl Into<String>) -> Self {
        Self {
            dm_cmd: DEFAULT_DM_CMD.to_string(),
            dm_sched: DEFAULT_DM_SCHED.to_string(),
            datamaster: datamaster.into(),
            schedules_dir: PathBuf::from(DEFAULT_SCHEDULES_DIR),
            snoop_command: DEFAULT_SNOOP_COMMAND.to_string(),
            rules: RuleSet::painted_nodes(),
        }
    }

    /// Read the environment, plus the file named by `DM_TESTBENCH_CONFIG`
    /// if set. Fails with `MissingEnvironment` when no device is configured.
    pub fn from_env() -> Result<Self> {
        let file = match env::config_file() {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file)
    }

    /// Like [`Config::from_env`], with an explicit config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::resolve(ConfigFile::load(path)?)
    }

    /// Merge a config file with the environment.
    pub fn resolve(file: ConfigFile) -> Result<Self> {
        let rules = file.rules()?;
        let datamaster = env::datamaster()
            .or(file.datamaster)
            .ok_or(TestbenchError::MissingEnvironment(env::DATAMASTER))?;

        Ok(Self {
            dm_cmd: env::dm_cmd()
                .or(file.dm_cmd)
                .unwrap_or_else(|| DEFAULT_DM_CMD.to_string()),
            dm_sched: env::dm_sched()
                .or(file.dm_sched)
                .unwrap_or_else(|| DEFAULT_DM_SCHED.to_string()),
            datamaster,
            schedules_dir: env::schedules_dir()
                .or(file.schedules_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEDULES_DIR)),
            snoop_command: env::snoop_command()
                .or(file.snoop_command)
                .unwrap_or_else(|| DEFAULT_SNOOP_COMMAND.to_string()),
            rules,
        })
    }

    pub fn with_binaries(mut self, dm_cmd: impl Into<String>, dm_sched: impl Into<String>) -> Self {
        self.dm_cmd = dm_cmd.into();
        self.dm_sched = dm_sched.into();
        self
    }

    pub fn with_schedules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schedules_dir = dir.into();
        self
    }

    pub fn with_snoop_command(mut self, command: impl Into<String>) -> Self {
        self.snoop_command = command.into();
        self
    }

    /// Path of a schedule or expected-result file inside the schedules directory.
    pub fn schedule(&self, name: &str) -> PathBuf {
        self.schedules_dir.join(name)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
