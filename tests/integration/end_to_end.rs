// tests/integration/end_to_end.rs
use std::fs;

use bundle_import::run_with_config;
use bundle_import_domain::ImportConfig;

#[test]
fn run_with_config_writes_both_bundle_files() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(src.path().join("b.jpg"), b"jpeg bytes").unwrap();
    fs::write(src.path().join("notes.txt"), b"ignored").unwrap();
    let bundle = out.path().join("scans.hib");

    let config = ImportConfig::new(src.path().to_str().unwrap(), &bundle).with_jobs(2);
    run_with_config(&config).unwrap();

    assert!(bundle.is_file());
    let data = fs::read(out.path().join("scans.hib.dat")).unwrap();
    assert_eq!(data[0], 1);
    assert!(data.ends_with(b"jpeg bytes"));
}

#[test]
fn run_with_config_reports_open_conflict() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.png"), b"png").unwrap();
    let bundle = out.path().join("scans.hib");
    fs::write(&bundle, b"existing").unwrap();

    let config = ImportConfig::new(src.path().to_str().unwrap(), &bundle);
    let err = run_with_config(&config).unwrap_err();

    assert!(format!("{err:#}").contains("already exists"));
    assert_eq!(fs::read(&bundle).unwrap(), b"existing");
}

#[test]
fn missing_directory_is_not_an_error() {
    let out = tempfile::tempdir().unwrap();
    let bundle = out.path().join("scans.hib");

    let config = ImportConfig::new(out.path().join("absent").to_str().unwrap(), &bundle);
    run_with_config(&config).unwrap();

    assert!(!bundle.exists());
}
