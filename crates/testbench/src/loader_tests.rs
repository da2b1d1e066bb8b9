// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use dm_capture::CaptureLog;

const LISTING: &str = "\
Data Master tcp/dm0
CPU 0: 12 nodes
Patterns on CPU 0:
IN_C0      entry BLOCK_A   exit BLOCK_IN0

A          entry BLOCK_A1  exit BLOCK_A2
B          entry BLOCK_B1  exit BLOCK_B2
";

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn names_follow_the_header() {
    assert_eq!(pattern_names(&lines(LISTING)), vec!["IN_C0", "A", "B"]);
}

#[test]
fn nothing_before_the_header_is_yielded() {
    let listing = lines("PPS0a  something\nNo patterns here\n");
    assert!(pattern_names(&listing).is_empty());
}

#[test]
fn header_line_itself_is_not_a_pattern() {
    assert!(pattern_names(&lines("Patterns PPS0a")).is_empty());
}

#[test]
fn blank_and_whitespace_lines_are_skipped_not_terminating() {
    let listing = lines("Patterns\n\n   \nP1\n\t\nP2 extra tokens\n");
    assert_eq!(pattern_names(&listing), vec!["P1", "P2"]);
}

#[test]
fn second_header_inside_section_is_treated_as_pattern_line() {
    // The section has no terminator; a second header is just another line.
    let listing = lines("Patterns CPU0\nP1\nPatterns CPU1\nP2\n");
    assert_eq!(pattern_names(&listing), vec!["P1", "Patterns", "P2"]);
}

#[test]
fn state_machine_transitions() {
    let mut parser = PatternListing::new(["header", "Patterns", "P1"].into_iter());
    assert_eq!(parser.state(), ListingState::BeforeHeader);
    assert_eq!(parser.next(), Some("P1".to_string()));
    assert_eq!(parser.state(), ListingState::InSection);
    assert_eq!(parser.next(), None);
}

#[test]
fn device_invocation_puts_device_first() {
    let inv = device_invocation("dm-cmd", "tcp/dm0", ["startpattern", "A", "-t", "3"]);
    assert_eq!(inv.command.program, "dm-cmd");
    assert_eq!(inv.command.args, vec!["tcp/dm0", "startpattern", "A", "-t", "3"]);
    assert_eq!(inv.allowed_codes, vec![0]);
}

#[cfg(unix)]
mod with_fake_binaries {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    struct Fixture {
        dir: tempfile::TempDir,
        config: Config,
        runner: Runner,
        log: CaptureLog,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("listing.txt");
        std::fs::write(&listing, LISTING).unwrap();
        let dm_sched = script(
            dir.path(),
            "dm-sched",
            &format!(
                "if [ $# -eq 1 ]; then cat '{}'; fi\nexit 0\n",
                listing.display()
            ),
        );
        let dm_cmd = script(dir.path(), "dm-cmd", "exit 0\n");
        let log = CaptureLog::new();
        Fixture {
            config: Config::new("tcp/dm0")
                .with_binaries(dm_cmd, dm_sched)
                .with_schedules_dir("/schedules"),
            runner: Runner::new().with_log(log.clone()),
            log,
            dir,
        }
    }

    fn started(log: &CaptureLog) -> Vec<String> {
        log.find_by_subcommand("startpattern")
            .iter()
            .filter_map(|e| e.command.arg_after("startpattern").map(str::to_string))
            .collect()
    }

    #[tokio::test]
    async fn add_schedule_only_adds() {
        let f = fixture();
        ScheduleLoader::new(&f.config, &f.runner)
            .add_schedule("a.dot")
            .await
            .unwrap();

        let entries = f.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command.args, vec!["tcp/dm0", "add", "/schedules/a.dot"]);
    }

    #[tokio::test]
    async fn start_named_pattern_skips_listing() {
        let f = fixture();
        ScheduleLoader::new(&f.config, &f.runner)
            .start_pattern("a.dot", "IN_C0")
            .await
            .unwrap();

        assert_eq!(f.log.len(), 2);
        assert_eq!(started(&f.log), vec!["IN_C0"]);
    }

    #[tokio::test]
    async fn start_all_patterns_starts_every_listed_name() {
        let f = fixture();
        let names = ScheduleLoader::new(&f.config, &f.runner)
            .start_all_patterns("a.dot")
            .await
            .unwrap();

        assert_eq!(names, vec!["IN_C0", "A", "B"]);
        assert_eq!(started(&f.log), vec!["IN_C0", "A", "B"]);
    }

    #[tokio::test]
    async fn start_first_pattern_stops_after_one() {
        let f = fixture();
        let names = ScheduleLoader::new(&f.config, &f.runner)
            .start_first_pattern("a.dot")
            .await
            .unwrap();

        assert_eq!(names, vec!["IN_C0"]);
        assert_eq!(started(&f.log), vec!["IN_C0"]);
    }

    #[tokio::test]
    async fn failing_add_stops_before_start() {
        let f = fixture();
        let config = f.config.clone().with_binaries(
            f.config.dm_cmd.clone(),
            script(f.dir.path(), "dm-sched-broken", "echo 'bad schedule' >&2\nexit 1\n"),
        );
        let err = ScheduleLoader::new(&config, &f.runner)
            .start_all_patterns("a.dot")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::TestbenchError::UnexpectedReturnCode { code: 1, .. }
        ));
        assert!(started(&f.log).is_empty());
    }
}
