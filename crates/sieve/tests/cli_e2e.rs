#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
  "forms": [
    { "name": "filters", "controls": [ { "name": "status", "value": "" } ] }
  ],
  "collections": [
    {
      "id": "list",
      "items": [
        { "text": "first", "attributes": { "status": "open" } },
        { "text": "second", "attributes": { "status": "open urgent" } },
        { "text": "third", "attributes": { "status": "closed" } }
      ]
    }
  ]
}"#;

fn sieve_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("sieve"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .env_remove("SIEVE_LOG")
        .env_remove("SIEVE_TAG")
        .env_remove("SIEVE_HOST")
        .env_remove("SIEVE_TARGETS")
        .arg("--no-color");
    cmd
}

fn setup() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let doc = temp.path().join("doc.json");
    fs::write(&doc, DOCUMENT).unwrap();
    (temp, doc)
}

fn hidden_flags(doc: &Path) -> Vec<bool> {
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(doc).unwrap()).unwrap();
    value["collections"][0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["hidden"].as_bool().unwrap_or(false))
        .collect()
}

#[test]
fn test_filter_prints_found_and_hidden() {
    let (temp, doc) = setup();

    sieve_cmd(temp.path())
        .args(["filter", doc.to_str().unwrap(), "--host", "list"])
        .args(["-f", "status=open", "-f", "status:not=urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list (1 found, 2 hidden"))
        .stdout(predicate::str::contains("+ first"))
        .stdout(predicate::str::contains("- second"));

    // Without --write the document is untouched
    assert_eq!(hidden_flags(&doc), vec![false, false, false]);
}

#[test]
fn test_filter_write_persists_hidden_state() {
    let (temp, doc) = setup();

    sieve_cmd(temp.path())
        .args(["filter", doc.to_str().unwrap(), "--target", "list"])
        .args(["-f", "status=closed", "--write"])
        .assert()
        .success();

    assert_eq!(hidden_flags(&doc), vec![true, true, false]);
}

#[test]
fn test_filter_json_report() {
    let (temp, doc) = setup();

    let output = sieve_cmd(temp.path())
        .args(["filter", doc.to_str().unwrap(), "--host", "list"])
        .args(["-f", "status:hi=urgent", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"]["status"], "completed");
    assert_eq!(report["targets"][0]["found"].as_array().unwrap().len(), 1);
    assert_eq!(report["targets"][0]["marked"].as_array().unwrap().len(), 1);
    assert!(report["highlight_rule"]
        .as_str()
        .unwrap()
        .starts_with("sieve-filter * :is("));
}

#[test]
fn test_filter_without_targets_is_skipped() {
    let (temp, doc) = setup();

    sieve_cmd(temp.path())
        .args(["filter", doc.to_str().unwrap(), "-f", "status=open"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped: no target collections"));
}

#[test]
fn test_filter_with_index_matches_text() {
    let (temp, doc) = setup();

    sieve_cmd(temp.path())
        .args(["filter", doc.to_str().unwrap(), "--host", "list"])
        .args(["--index", "text", "-f", "text=SECOND"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list (1 found, 2 hidden"));
}

#[test]
fn test_index_adds_and_removes_attribute() {
    let (temp, doc) = setup();

    sieve_cmd(temp.path())
        .args(["index", doc.to_str().unwrap(), "text", "--host", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 3 items"));

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&doc).unwrap()).unwrap();
    assert_eq!(
        value["collections"][0]["items"][1]["attributes"]["text"],
        "second"
    );

    sieve_cmd(temp.path())
        .args(["index", doc.to_str().unwrap(), "text", "--host", "list", "--remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unindexed 3 items"));
}

#[test]
fn test_query_renders_selector() {
    let temp = TempDir::new().unwrap();

    sieve_cmd(temp.path())
        .args(["query", "-f", "status=open", "-f", "status:not=urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"[data-sieve-filter-status*="open" i]:not([data-sieve-filter-status*="urgent" i])"#,
        ));
}

#[test]
fn test_query_reports_rejected_field() {
    let temp = TempDir::new().unwrap();

    sieve_cmd(temp.path())
        .args(["query", "--tag", "x", "-f", "bad name=1", "-f", "q=a"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"[data-x-q*="a" i]"#))
        .stdout(predicate::str::contains("Ignoring field \"bad name\""));
}

#[test]
fn test_config_reads_project_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".sieve.toml"), "tag = \"x-filter\"\n").unwrap();

    sieve_cmd(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("tag = \"x-filter\""))
        .stdout(predicate::str::contains("debounce_ms = 50"));
}

#[test]
fn test_missing_document_fails() {
    let temp = TempDir::new().unwrap();

    sieve_cmd(temp.path())
        .args(["filter", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
