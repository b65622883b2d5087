//! End-to-end tests for the rx2gantt binary.
//!
//! These exercise argument handling and discovery errors only; they must
//! not depend on a PDF runtime being installed on the test machine.

use assert_cmd::Command;
use predicates::prelude::*;

fn rx2gantt() -> Command {
    Command::cargo_bin("rx2gantt").expect("binary builds")
}

#[test]
fn help_describes_the_tool() {
    rx2gantt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--offline"))
        .stdout(predicate::str::contains("--no-chart"));
}

#[test]
fn version_flag_reports_a_version() {
    rx2gantt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rx2gantt"));
}

#[test]
fn missing_input_path_fails_with_message() {
    rx2gantt()
        .arg("/no/such/place/orders.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn empty_folder_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    rx2gantt()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no PDF documents found"));
}

#[test]
fn input_argument_is_required() {
    rx2gantt()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
