// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Build scripts are expected to panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::fs::File::create(path).unwrap();

    // (constant name, variable name, one-line doc)
    let vars = [
        ("DATAMASTER", "DATAMASTER", "Device identifier (mandatory)."),
        (
            "TEST_BINARY_DM_CMD",
            "TEST_BINARY_DM_CMD",
            "Path of the dm-cmd binary.",
        ),
        (
            "TEST_BINARY_DM_SCHED",
            "TEST_BINARY_DM_SCHED",
            "Path of the dm-sched binary.",
        ),
        (
            "TEST_SCHEDULES",
            "TEST_SCHEDULES",
            "Directory holding schedules and expected results.",
        ),
        ("SNOOP_COMMAND", "SNOOP_COMMAND", "Snoop command template."),
        (
            "DM_TESTBENCH_CONFIG",
            "DM_TESTBENCH_CONFIG",
            "Optional TOML configuration file.",
        ),
        (
            "DM_TESTBENCH_LOG",
            "DM_TESTBENCH_LOG",
            "Tracing filter directive.",
        ),
    ];

    for (const_name, env_name, doc) in vars {
        writeln!(f, "/// `{env_name}`: {doc}").unwrap();
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";").unwrap();
    }
    println!("cargo:rerun-if-changed=build.rs");
}
