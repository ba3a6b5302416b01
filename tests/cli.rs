use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

const CATALOG: &str = r#"{
  "items": [
    {"id": "1", "categories": "category:tech brand:apple", "fields": {"title": "Laptop", "price": 1200}},
    {"id": "2", "categories": "category:tech brand:samsung", "fields": {"title": "Phone", "price": 800}},
    {"id": "3", "categories": "category:design brand:apple", "fields": {"title": "Tablet", "price": 600}}
  ],
  "controls": [
    {"id": "apple", "token": "brand:apple"}
  ]
}"#;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn afs() -> Command {
    let mut cmd = Command::cargo_bin("afs").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn eval_prints_every_item_without_filters() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);

    afs()
        .arg("eval")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Laptop"))
        .stdout(predicate::str::contains("Phone"))
        .stdout(predicate::str::contains("Tablet"))
        .stdout(predicate::str::contains("3 of 3 items"));
}

#[test]
fn eval_toggle_filters_items() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);

    afs()
        .arg("eval")
        .arg(&catalog)
        .args(["--toggle", "brand:samsung"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phone"))
        .stdout(predicate::str::contains("Laptop").not());
}

#[test]
fn eval_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);

    let output = afs()
        .arg("eval")
        .arg(&catalog)
        .args(["--control", "apple", "--sort", "price:desc", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["activeFilters"], serde_json::json!(["brand:apple"]));
    assert_eq!(view["visible"], serde_json::json!(["1", "3"]));
    assert_eq!(view["page"]["totalItems"], 2);
}

#[test]
fn eval_with_config_and_paging() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);
    let config = write(&dir, "afs.json", r#"{"itemsPerPage": 2}"#);

    let output = afs()
        .arg("eval")
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .args(["--page", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["pageItems"], serde_json::json!(["3"]));
    assert_eq!(view["page"]["totalPages"], 2);
}

#[test]
fn eval_ignores_unknown_control() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);

    afs()
        .arg("eval")
        .arg(&catalog)
        .args(["--control", "missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 of 3 items"));
}

#[test]
fn eval_fails_on_missing_catalog() {
    let dir = tempfile::tempdir().unwrap();

    afs()
        .arg("eval")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn eval_skips_malformed_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);

    afs()
        .arg("eval")
        .arg(&catalog)
        .args(["--toggle", "a:b:c", "--toggle", "brand:apple"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 2 items"))
        .stderr(predicate::str::contains("ignoring toggle"));
}

#[test]
fn config_reports_normalised_logic_and_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        &dir,
        "afs.json",
        r#"{"filterCategoryMode": "mixed", "filterTypeLogic": {"brand": {"mode": "AND"}, "size": {"mode": "OR", "multi": true}, "x": 42}}"#,
    );

    afs()
        .arg("config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("mixed"))
        .stdout(predicate::str::contains("brand"))
        .stdout(predicate::str::contains("OR multi"))
        .stderr(predicate::str::contains("defaulting to OR"));
}

#[test]
fn config_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    afs()
        .arg("config")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
