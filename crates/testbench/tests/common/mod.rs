// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Fake `dm-cmd` / `dm-sched` pair for running scenarios without hardware.
//!
//! Both binaries are POSIX shell scripts keeping their state in files next
//! to themselves, so every fixture is an independent device.

#![allow(dead_code)]

use dm_testbench::capture::CaptureLog;
use dm_testbench::{Config, Testbench};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DEVICE: &str = "tcp/fake-dm";

/// Four CPUs with up to 32 threads each, plus the dynamic-branch schedule.
const FAKE_DM_CMD: &str = r#"#!/bin/sh
state="$(dirname "$0")/state"
mkdir -p "$state"
shift

cpus=""
threads=""
while [ $# -gt 0 ]; do
  case "$1" in
    -c) cpus="$2"; shift 2 ;;
    -t) threads="$2"; shift 2 ;;
    *) break ;;
  esac
done
cmd="$1"
[ $# -gt 0 ] && shift

# hex masks stay masks, decimal numbers select one bit
to_mask() {
  case "$1" in
    "") echo "$2" ;;
    0x*|0X*) echo $(( $1 )) ;;
    *) echo $(( 1 << $1 )) ;;
  esac
}

mask_of() {
  cat "$state/cpu$1" 2>/dev/null || echo 0
}

case "$cmd" in
  reset)
    rm -rf "$state"
    ;;
  running)
    sel=$(to_mask "$cpus" 15)
    i=0
    while [ $i -lt 4 ]; do
      if [ $(( (sel >> i) & 1 )) -eq 1 ]; then
        printf 'CPU %d Running Threads: 0x%x\n' "$i" "$(mask_of $i)"
      fi
      i=$((i + 1))
    done
    ;;
  startpattern)
    name="$1"
    shift
    [ "$1" = "-t" ] && threads="$2"
    case "$name" in
      PPS*)
        cpu=$(echo "$name" | cut -c4)
        m=$(mask_of "$cpu")
        echo $(( m | (1 << ${threads:-0}) )) > "$state/cpu$cpu"
        ;;
      IN_C0)
        if [ -f "$state/flow" ]; then
          printf 'BLOCK_A\nBLOCK_IN0\nBLOCK_B\n' > "$state/visited"
          echo executed > "$state/flow"
        else
          printf 'BLOCK_A\nBLOCK_IN0\n' > "$state/visited"
        fi
        ;;
      *)
        echo "unknown pattern $name" >&2
        exit 1
        ;;
    esac
    ;;
  abort)
    csel=$(to_mask "$cpus" 15)
    tsel=$(to_mask "$threads" 4294967295)
    i=0
    while [ $i -lt 4 ]; do
      if [ $(( (csel >> i) & 1 )) -eq 1 ]; then
        t=0
        while [ $t -lt 32 ]; do
          if [ $(( (tsel >> t) & 1 )) -eq 1 ]; then
            echo "CPU $i Thread $t aborted."
          fi
          t=$((t + 1))
        done
        echo $(( $(mask_of $i) & ~tsel )) > "$state/cpu$i"
      fi
      i=$((i + 1))
    done
    ;;
  flowpattern)
    echo "$*" > "$state/flow-args"
    echo pending > "$state/flow"
    ;;
  rawqueue)
    echo "Prio Low"
    if [ -f "$state/flow" ]; then
      printf '  Flow IN_C0 -> B (%s) VTIME: 0x%x\n' "$(cat "$state/flow")" "$$"
    fi
    ;;
  *)
    echo "unknown command $cmd" >&2
    exit 2
    ;;
esac
"#;

const FAKE_DM_SCHED: &str = r#"#!/bin/sh
state="$(dirname "$0")/state"
mkdir -p "$state"
shift

case "$1" in
  "")
    echo "Patterns on CPU 0:"
    [ -f "$state/schedules" ] && echo "IN_C0      entry BLOCK_A   exit BLOCK_IN0"
    ;;
  add)
    [ -n "$2" ] || exit 1
    echo "$2" >> "$state/schedules"
    ;;
  rawvisited)
    cat "$state/visited" 2>/dev/null
    ;;
  *)
    echo "unknown command $1" >&2
    exit 2
    ;;
esac
"#;

/// Ten rows over two seconds; column 20 holds the event id.
const FAKE_SNOOP: &str = r#"#!/bin/sh
i=0
while [ $i -lt 10 ]; do
  us=$(( i * 2000000 / 9 ))
  printf 'tDeadline: 2026-10-18 10:00:%02d.%06d123' $(( us / 1000000 )) $(( us % 1000000 ))
  f=3
  while [ $f -lt 20 ]; do printf ' f%d' $f; f=$((f + 1)); done
  printf ' 0x%04x\n' $(( i % 2 ))
  i=$((i + 1))
done
"#;

/// Golden files matching the fake device's dynamic-branch behavior.
const GOLDEN: &[(&str, &str)] = &[
    ("dynamic-branch-single-expected-0-0.txt", "BLOCK_A\nBLOCK_IN0\n"),
    (
        "dynamic-branch-single-expected-1-1.txt",
        "Prio Low\n  Flow IN_C0 -> B (pending) VTIME: 0x0\n",
    ),
    (
        "dynamic-branch-single-expected-1-3.txt",
        "BLOCK_A\nBLOCK_IN0\nBLOCK_B\n",
    ),
    (
        "dynamic-branch-single-expected-1-4.txt",
        "Prio Low\n  Flow IN_C0 -> B (executed) VTIME: 0x0\n",
    ),
];

pub struct FakeDevice {
    pub dir: TempDir,
    pub bench: Testbench,
    pub log: CaptureLog,
}

impl FakeDevice {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        let schedules = dir.path().join("schedules");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::create_dir_all(&schedules).unwrap();

        let dm_cmd = write_script(&bin, "dm-cmd", FAKE_DM_CMD);
        let dm_sched = write_script(&bin, "dm-sched", FAKE_DM_SCHED);
        let snoop = write_script(&bin, "snoop", FAKE_SNOOP);
        for (name, content) in GOLDEN {
            std::fs::write(schedules.join(name), content).unwrap();
        }

        let config = Config::new(DEVICE)
            .with_binaries(path_str(&dm_cmd), path_str(&dm_sched))
            .with_schedules_dir(&schedules)
            .with_snoop_command(path_str(&snoop));
        let log = CaptureLog::new();
        let bench = Testbench::new(config).with_log(log.clone());
        Self { dir, bench, log }
    }

    pub fn schedules(&self) -> PathBuf {
        self.dir.path().join("schedules")
    }

    /// Overwrite one golden file.
    pub fn golden(&self, name: &str, content: &str) {
        std::fs::write(self.schedules().join(name), content).unwrap();
    }

    /// Arguments of the last `flowpattern` call as seen by the device.
    pub fn flow_args(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("bin/state/flow-args"))
            .unwrap()
            .trim_end()
            .to_string()
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
