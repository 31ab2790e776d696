use std::fs;
use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_png(path: &Path) {
    let img = image::RgbImage::from_pixel(16, 8, image::Rgb([255, 255, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    fs::write(path, bytes).unwrap();
}

/// Temp workspace with a mock-only config and a sample term sheet image.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config = serde_json::json!({
        "extraction": { "strategy": "mock" },
        "storage": { "snapshot_dir": dir.path().join("snapshots") },
    });
    fs::write(dir.path().join("config.json"), config.to_string()).unwrap();
    write_png(&dir.path().join("term-sheet.png"));
    dir
}

fn tsr(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tsr").unwrap();
    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"));
    cmd
}

#[test]
fn process_outputs_all_fields_as_json() {
    let dir = workspace();

    tsr(&dir)
        .args(["process", "term-sheet.png", "--mock", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"field-12\""))
        .stdout(predicate::str::contains("\"validationScore\": 100"))
        .stdout(predicate::str::contains("\"status\": \"validated\""));
}

#[test]
fn process_writes_csv_output_file() {
    let dir = workspace();

    tsr(&dir)
        .args(["process", "term-sheet.png", "-f", "csv", "-o", "fields.csv"])
        .assert()
        .success();

    let csv = fs::read_to_string(dir.path().join("fields.csv")).unwrap();
    assert!(csv.starts_with("id,label,value,valid"));
    assert_eq!(csv.lines().count(), 13);
}

#[test]
fn process_rejects_unsupported_format() {
    let dir = workspace();
    fs::write(dir.path().join("notes.xyz"), "hello").unwrap();

    tsr(&dir)
        .args(["process", "notes.xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: xyz"));
}

#[test]
fn process_rejects_unreadable_image() {
    let dir = workspace();
    fs::write(dir.path().join("broken.png"), "not a png").unwrap();

    tsr(&dir)
        .args(["process", "broken.png"])
        .assert()
        .failure();
}

#[test]
fn validate_without_saved_document_fails() {
    let dir = workspace();

    tsr(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No current document"));
}

#[test]
fn edit_and_revalidate_saved_document() {
    let dir = workspace();

    tsr(&dir)
        .args(["process", "term-sheet.png", "--save"])
        .assert()
        .success();
    assert!(dir.path().join("snapshots/current-document.json").exists());

    tsr(&dir)
        .args(["validate", "--set", "Closing Date=invalid-date", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: needs review"))
        .stdout(predicate::str::contains("Validation score: 92%"))
        .stderr(predicate::str::contains("Closing Date is now invalid"));

    tsr(&dir)
        .args(["validate", "--set", "Closing Date=2023-09-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation score: 100%"));
}

#[test]
fn validate_rejects_unknown_field() {
    let dir = workspace();

    tsr(&dir)
        .args(["process", "term-sheet.png", "--save"])
        .assert()
        .success();

    tsr(&dir)
        .args(["validate", "--set", "Dividend Policy=none"])
        .assert()
        .failure();
}

#[test]
fn batch_writes_summary() {
    let dir = workspace();
    write_png(&dir.path().join("second.png"));
    fs::write(dir.path().join("ignored.xyz"), "skip me").unwrap();

    tsr(&dir)
        .args(["batch", "*.*", "-o", "out", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    assert!(dir.path().join("out/term-sheet.json").exists());
    assert!(dir.path().join("out/second.json").exists());

    let summary = fs::read_to_string(dir.path().join("out/summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
}

#[test]
fn batch_fails_fast_without_continue_on_error() {
    let dir = workspace();
    fs::write(dir.path().join("broken.png"), "not a png").unwrap();

    tsr(&dir)
        .args(["batch", "*.png"])
        .assert()
        .failure();

    tsr(&dir)
        .args(["batch", "*.png", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful"));
}
