mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn write_stream(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    let json = serde_json::to_vec(&common::tokens(source)).unwrap();
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn parse_prints_tree_as_json() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_stream(&tmp_dir, "ok.json", "print 1 + 2 ;");

    let mut cmd = Command::cargo_bin("loxparse").unwrap();
    cmd.arg("parse").arg(path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Print\""))
        .stdout(predicate::str::contains("\"Binary\""));
}

#[test]
fn check_reports_diagnostics_and_fails() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_stream(&tmp_dir, "bad.json", "var ;\nbreak ;");

    let mut cmd = Command::cargo_bin("loxparse").unwrap();
    cmd.arg("check").arg(path);
    cmd.assert()
        .code(65)
        .stderr(predicate::str::contains(
            "Error near ';' at line 1: expected variable name",
        ))
        .stderr(predicate::str::contains("expected inside the loop"));
}

#[test]
fn check_reads_stdin() {
    let json = serde_json::to_string(&common::tokens("var x = 1 ;")).unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("loxparse").unwrap();
    cmd.arg("check").write_stdin(json);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 declaration(s)"));
}

#[test]
fn malformed_stream_is_an_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("broken.json");
    std::fs::write(&path, "[]").unwrap();

    let mut cmd = Command::cargo_bin("loxparse").unwrap();
    cmd.arg("parse").arg(path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("token stream is empty"));
}
