//! Smoke tests for the sett-harness binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_demo_runs_clean() {
    let mut cmd = Command::cargo_bin("sett-harness").unwrap();
    cmd.args(["demo", "--sleep", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo complete"));
}

#[test]
fn test_check_confirms_every_operation() {
    let mut cmd = Command::cargo_bin("sett-harness").unwrap();
    cmd.arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok harvest"))
        .stdout(predicate::str::contains("all invariants held"));
}

#[test]
fn test_demo_json_output_is_parseable() {
    let mut cmd = Command::cargo_bin("sett-harness").unwrap();
    let output = cmd
        .args(["demo", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // Two pretty-printed reports are emitted; the stream must start as JSON
    let text = String::from_utf8(output).unwrap();
    assert!(text.trim_start().starts_with('{'));
}
