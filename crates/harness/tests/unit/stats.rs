//! # Statistics Dump Tests
//!
//! Section splitting, line parsing, and banner errors.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use roibench_core::HarnessError;
use roibench_core::stats::StatsDump;

use crate::common::stats_section;

#[test]
fn test_one_section_per_dump() {
    let text = [
        stats_section(0.0, &[]),
        stats_section(0.000_25, &[("system.cpu.rob.reads", 1000)]),
        stats_section(0.000_01, &[("system.cpu.rob.reads", 5)]),
    ]
    .concat();
    let dump = StatsDump::parse(&text).unwrap();
    assert_eq!(dump.len(), 3);
    assert_eq!(dump.section(1).unwrap().count("system.cpu.rob.reads"), 1000);
    assert_eq!(dump.section(1).unwrap().sim_seconds(), Some(0.000_25));
    assert_eq!(dump.section(2).unwrap().count("system.cpu.rob.reads"), 5);
}

#[test]
fn test_line_parsing() {
    let text = "\
---------- Begin Simulation Statistics ----------
simSeconds                                   0.000500                       # Number of seconds simulated (Second)
system.cpu.branchPred.lookups_0::total           1234                       # Number of BP lookups (Count)
system.cpu.ipc                               1.523000                       # IPC: instructions per cycle ((Count/Cycle))
system.cpu.statIssuedInstType_0::IntAlu         40.5%      12.0%            # fractions
system.cpu.committedInsts::samples                nan                       # undefined ratio

---------- End Simulation Statistics   ----------
";
    let dump = StatsDump::parse(text).unwrap();
    assert_eq!(dump.len(), 1);
    let section = dump.section(0).unwrap();
    assert_eq!(section.sim_seconds(), Some(0.0005));
    assert_eq!(section.count("system.cpu.branchPred.lookups_0::total"), 1234);
    assert_eq!(section.get("system.cpu.ipc"), Some(1.523));
    assert_eq!(section.get("system.cpu.statIssuedInstType_0::IntAlu"), None);
    assert_eq!(section.count("system.cpu.committedInsts::samples"), 0);
    assert_eq!(section.count("system.cpu.not.there"), 0);
}

#[test]
fn test_repeated_statistic_keeps_first_value() {
    let text = stats_section(
        0.001,
        &[("system.cpu.rob.reads", 100), ("system.cpu.rob.reads", 999)],
    );
    let dump = StatsDump::parse(&text).unwrap();
    assert_eq!(dump.section(0).unwrap().count("system.cpu.rob.reads"), 100);
}

#[test]
fn test_legacy_sim_seconds_name() {
    let text = "---------- Begin Simulation Statistics ----------\nsim_seconds 0.5\n---------- End Simulation Statistics ----------\n";
    let dump = StatsDump::parse(text).unwrap();
    assert_eq!(dump.section(0).unwrap().sim_seconds(), Some(0.5));
}

#[test]
fn test_empty_sections_are_dropped() {
    let text = "---------- Begin Simulation Statistics ----------\n\n---------- End Simulation Statistics ----------\n";
    assert!(StatsDump::parse(text).unwrap().is_empty());
    assert!(StatsDump::parse("").unwrap().is_empty());
}

#[test]
fn test_truncated_dump_keeps_last_section() {
    let full = stats_section(0.1, &[("system.cpu.rob.writes", 7)]);
    let truncated = full.replace("---------- End Simulation Statistics   ----------\n", "");
    let dump = StatsDump::parse(&truncated).unwrap();
    assert_eq!(dump.len(), 1);
    assert_eq!(dump.section(0).unwrap().count("system.cpu.rob.writes"), 7);
}

#[test]
fn test_nested_begin_is_rejected() {
    let text = "---------- Begin Simulation Statistics ----------\nsimSeconds 1\n---------- Begin Simulation Statistics ----------\n";
    let err = StatsDump::parse(text).unwrap_err();
    assert!(matches!(err, HarnessError::StatsParse { line: 3, .. }));
}

#[test]
fn test_unmatched_end_is_rejected() {
    let text = "simSeconds 1\n---------- End Simulation Statistics ----------\n";
    let err = StatsDump::parse(text).unwrap_err();
    assert!(matches!(err, HarnessError::StatsParse { line: 2, .. }));
}

#[test]
fn test_from_path() {
    let mut file = NamedTempFile::new().unwrap();
    let text = stats_section(0.002, &[("system.cpu.decode.decodedInsts", 99)]);
    file.write_all(text.as_bytes()).unwrap();

    let dump = StatsDump::from_path(file.path()).unwrap();
    assert_eq!(dump.len(), 1);
    assert_eq!(
        dump.sections()[0].count("system.cpu.decode.decodedInsts"),
        99
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StatsDump::from_path(dir.path().join("stats.txt")).unwrap_err();
    assert!(matches!(err, HarnessError::Io(_)));
}
