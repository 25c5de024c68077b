// tests/integration/cli_smoke.rs
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bundle-import"));
    cmd.env_remove("RUST_LOG").env_remove("BUNDLE_IMPORT_JOBS");
    cmd
}

#[test]
fn shows_help() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--hdfs-input").and(predicate::str::contains("--force")));
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
    bin()
        .arg("only-one")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT_BUNDLE"));
}

#[test]
fn imports_supported_files_in_order() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.png"), b"png").unwrap();
    fs::write(src.path().join("B.JPG"), b"jpg").unwrap();
    fs::write(src.path().join("c.txt"), b"txt").unwrap();
    let bundle = out.path().join("out.hib");

    let assert = bin()
        .arg(src.path())
        .arg(&bundle)
        .args(["-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Input FS: local FS"))
        .stdout(predicate::str::contains("Overwrite bundle if it exists: false"))
        .stdout(predicate::str::contains("Imported: 2 (skipped: 1)"))
        .stdout(predicate::str::contains("Created:"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let jpg = stdout.find(" ** added: b.jpg").unwrap();
    let png = stdout.find(" ** added: a.png").unwrap();
    assert!(jpg < png);
    assert!(!stdout.contains("c.txt"));
    assert!(out.path().join("out.hib.dat").is_file());
}

#[test]
fn empty_directory_prints_a_notice_and_succeeds() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    bin()
        .arg(src.path())
        .arg(out.path().join("out.hib"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Did not find any files in the local FS directory"));

    assert!(!out.path().join("out.hib").exists());
}

#[test]
fn existing_bundle_needs_force() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(src.path().join("x.dcm"), b"dicom").unwrap();
    let bundle = out.path().join("out.hib");
    fs::write(&bundle, b"old").unwrap();

    bin().arg(src.path()).arg(&bundle).assert().failure().stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read(&bundle).unwrap(), b"old");

    bin()
        .arg("-f")
        .arg(src.path())
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains(" ** added: x.dcm"));
    assert_ne!(fs::read(&bundle).unwrap(), b"old");
}
