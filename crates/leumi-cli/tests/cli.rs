//! Command-line tests that need no network access.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXTRACTED: &str = r#"{
  "lastName": "כהן",
  "firstName": "דנה",
  "idNumber": "123456789",
  "gender": "נקבה",
  "dateOfBirth": {"day": "03", "month": "04", "year": "1985"},
  "mobilePhone": "050-1234567",
  "dateOfInjury": {"day": "10", "month": "02", "year": "2025"},
  "accidentDescription": "החלקתי על רצפה רטובה במטבח",
  "injuredBodyPart": "יד שמאל",
  "formFillingDate": {"day": "12", "month": "02", "year": "2025"}
}"#;

fn leumi(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("leumi").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.json"));
    cmd
}

fn write_extracted(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("fields.json");
    fs::write(&path, EXTRACTED).unwrap();
    path
}

fn init_config(dir: &TempDir) {
    leumi(dir).args(["config", "init"]).assert().success();
}

#[test]
fn test_validate_reports_bad_id_as_json() {
    let dir = TempDir::new().unwrap();
    init_config(&dir);
    let input = write_extracted(&dir);

    leumi(&dir)
        .arg("validate")
        .arg(&input)
        .args(["--today", "2025-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completeness_score\""))
        .stdout(predicate::str::contains("fails the check digit"))
        .stdout(predicate::str::contains("\"date_of_injury\": \"2025-02-10\""));
}

#[test]
fn test_validate_strict_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    init_config(&dir);
    let input = write_extracted(&dir);

    leumi(&dir)
        .arg("validate")
        .arg(&input)
        .args(["--today", "2025-03-01", "--strict", "-f", "text"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Completeness: 88.9%"));
}

#[test]
fn test_validate_csv_output() {
    let dir = TempDir::new().unwrap();
    init_config(&dir);
    let input = write_extracted(&dir);

    leumi(&dir)
        .arg("validate")
        .arg(&input)
        .args(["--today", "2025-03-01", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("field,label_en,label_he,value"))
        .stdout(predicate::str::contains("mobile_phone,Mobile phone,טלפון נייד,0501234567"));
}

#[test]
fn test_validate_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    init_config(&dir);
    let input = dir.path().join("broken.json");
    fs::write(&input, "{\"lastName\": ").unwrap();

    leumi(&dir)
        .arg("validate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_config_path_and_init() {
    let dir = TempDir::new().unwrap();

    leumi(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));

    init_config(&dir);
    assert!(dir.path().join("config.json").exists());

    leumi(&dir).args(["config", "init"]).assert().failure();
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    init_config(&dir);

    leumi(&dir)
        .args(["config", "set", "validation.min_description_chars", "20"])
        .assert()
        .success();

    leumi(&dir)
        .args(["config", "get", "validation.min_description_chars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20"));

    leumi(&dir)
        .args(["config", "get", "ocr.model_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prebuilt-layout"));

    leumi(&dir)
        .args(["config", "get", "ocr.no_such_key"])
        .assert()
        .failure();
}
