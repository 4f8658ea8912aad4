//! Process contract of the sense-eval binary
//!
//! - Success prints the five summary lines on stdout and exits 0
//! - Config, dataset and data-size failures print one `[ERROR] - ` line,
//!   exit 1 and never print statistics

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const PARAMS: &str = r#"[evaluation_params]
seedNo = 3
dictionary = "tiny.json"
pos = "noun"
numOfSenses = 2
numOfExamp = 3
lemmatize = false
rmStopwords = true
rmPunct = true
testIterations = 4
grouped = false
baseLineMethod = "wordCrossover"
"#;

fn write_dictionary(dir: &Path) {
    let mut dictionary = serde_json::Map::new();
    for word in ["bank", "bark", "pitch"] {
        let senses: Vec<_> = (0..2)
            .map(|s| {
                json!({
                    "def": format!("{word} cue{s}"),
                    "pos": "noun",
                    "examples": (0..4)
                        .map(|e| json!({ "sent": format!("a {word} with cue{s} here {e}") }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        dictionary.insert(word.to_string(), json!(senses));
    }
    fs::write(dir.join("tiny.json"), serde_json::to_string(&dictionary).unwrap()).unwrap();
}

/// Tempdir holding the dictionary and `eval.toml` with `params`.
fn workspace(params: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_dictionary(dir.path());
    fs::write(dir.path().join("eval.toml"), params).unwrap();
    dir
}

fn sense_eval(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sense-eval").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg(dir.path().join("eval.toml"))
        .arg("--data-dir")
        .arg(dir.path());
    cmd
}

/// Run and check the single-line error contract; returns the line.
fn assert_fails_with_one_line(dir: &TempDir) -> String {
    let assert = sense_eval(dir)
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("[ERROR] - "))
        .stdout(predicate::str::contains("Average").not());
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    stdout
}

#[test]
fn test_success_prints_five_summary_lines() {
    let dir = workspace(PARAMS);
    let assert = sense_eval(&dir).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5, "{stdout}");
    assert!(lines[0].starts_with("Average: "));
    assert!(lines[1].starts_with("Maximum: "));
    assert!(lines[2].starts_with("Minimum: "));
    assert!(lines[3].starts_with("Standard deviation: "));
    assert!(lines[4].ends_with(" seconds"));
}

#[test]
fn test_json_report() {
    let dir = workspace(PARAMS);
    let assert = sense_eval(&dir).arg("--json").assert().success();
    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["trials"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_unknown_key_is_one_line_error() {
    let dir = workspace(&format!("{PARAMS}turbo = true\n"));
    let line = assert_fails_with_one_line(&dir);
    assert!(line.contains("turbo"));
}

#[test]
fn test_type_mismatch_is_one_line_error() {
    let dir = workspace(&PARAMS.replace("seedNo = 3", "seedNo = \"three\""));
    let line = assert_fails_with_one_line(&dir);
    assert!(line.contains("Config parse error"));
}

#[test]
fn test_invalid_value_is_one_line_error() {
    let dir = workspace(&PARAMS.replace("testIterations = 4", "testIterations = 0"));
    let line = assert_fails_with_one_line(&dir);
    assert!(line.contains("testIterations"));
}

#[test]
fn test_missing_dictionary_is_one_line_error() {
    let dir = workspace(&PARAMS.replace("tiny.json", "absent.json"));
    let line = assert_fails_with_one_line(&dir);
    assert!(line.contains("absent.json"));
}

#[test]
fn test_insufficient_data_is_one_line_error() {
    let dir = workspace(&PARAMS.replace("numOfSenses = 2", "numOfSenses = 5"));
    let line = assert_fails_with_one_line(&dir);
    assert!(line.contains("Insufficient data"));
}
