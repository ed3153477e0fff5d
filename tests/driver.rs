//! Tests for the text-file driver, in-process and through the binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use persistence1d::cli::{self, DriverArgs};
use persistence1d::prelude::*;

fn write_input(dir: &Path, name: &str, values: &[f64]) -> std::path::PathBuf {
    let path = dir.join(name);
    let text: String = values.iter().map(|v| format!("{v}\n")).collect();
    fs::write(&path, text).unwrap();
    path
}

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_persistence1d"))
}

// ============================================================
// IN-PROCESS
// ============================================================

#[test]
fn test_run_writes_result_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "nested.txt",
        &[2.0, 5.0, 7.0, -12.0, -13.0, -7.0, 10.0, 18.0, 6.0, 8.0, 7.0, 4.0],
    );

    let args = DriverArgs::parse([input.to_str().unwrap()]).unwrap();
    let report = cli::run(&args).unwrap();

    assert_eq!(report.output, dir.path().join("nested_res.txt"));
    assert_eq!(report.samples, 12);
    assert_eq!(report.pairs_written, 3);
    assert_eq!(fs::read_to_string(&report.output).unwrap(), "11\n7\n0\n2\n8\n9\n");
}

#[test]
fn test_run_with_threshold_and_matlab_indexing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "nested.txt",
        &[2.0, 5.0, 7.0, -12.0, -13.0, -7.0, 10.0, 18.0, 6.0, 8.0, 7.0, 4.0],
    );

    let args = DriverArgs::parse([input.to_str().unwrap(), "10", "-MATLAB"]).unwrap();
    let report = cli::run(&args).unwrap();
    assert_eq!(fs::read_to_string(report.output).unwrap(), "12\n8\n");
}

#[test]
fn test_run_overwrites_previous_result() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "flat.txt", &[1.0, 2.0, 3.0]);
    let output = dir.path().join("flat_res.txt");
    fs::write(&output, "stale\n").unwrap();

    let args = DriverArgs::parse([input.to_str().unwrap()]).unwrap();
    cli::run(&args).unwrap();
    assert_eq!(fs::read_to_string(output).unwrap(), "");
}

#[test]
fn test_run_rejects_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.txt");
    fs::write(&input, "1.0\ntwo\n3.0\n").unwrap();

    let args = DriverArgs::parse([input.to_str().unwrap()]).unwrap();
    let err = cli::run(&args).unwrap_err();
    assert!(matches!(err, PersistenceError::Parse { line: 2, .. }));
    assert!(!dir.path().join("bad_res.txt").exists());
}

// ============================================================
// BINARY
// ============================================================

#[test]
fn test_binary_success() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "peaks.txt", &[1.0, 2.0, 3.0, 1.0, 4.0, 10.0, -5.0]);

    let status = binary().arg(&input).arg("2.1").status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read_to_string(dir.path().join("peaks_res.txt")).unwrap(), "0\n5\n");
}

#[test]
fn test_binary_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "peaks.txt", &[1.0, 2.0, 1.0]);

    let missing_file = binary().status().unwrap();
    assert_eq!(missing_file.code(), Some(1));

    let bad_threshold = binary().arg(&input).arg("abc").status().unwrap();
    assert_eq!(bad_threshold.code(), Some(2));

    let unreadable = binary().arg(dir.path().join("missing.txt")).status().unwrap();
    assert_eq!(unreadable.code(), Some(3));

    // The result path is taken by a directory
    fs::create_dir(dir.path().join("peaks_res.txt")).unwrap();
    let unwritable = binary().arg(&input).status().unwrap();
    assert_eq!(unwritable.code(), Some(4));
}
