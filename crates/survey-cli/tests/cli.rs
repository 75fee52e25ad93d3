//! Runs of the `survey-analysis` binary in a scratch working directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

mod common;

use common::survey_csv;

fn write_data(base: &Path, contents: &str) {
    let data_dir = base.join("data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(data_dir.join("survey.csv"), contents).unwrap();
}

fn run_binary(base: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_survey-analysis"))
        .args(args)
        .current_dir(base)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run survey-analysis")
}

#[test]
fn default_run_writes_manifest_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_data(dir.path(), &survey_csv());

    let output = run_binary(dir.path(), &[]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.path().join("output/manifest.json").is_file());
    assert!(dir.path().join("output/report.md").is_file());
}

#[test]
fn missing_outcome_column_exits_one_and_names_it() {
    let dir = tempfile::tempdir().unwrap();
    write_data(dir.path(), &survey_csv().replacen("Q29", "Q29_OLD", 1));

    let output = run_binary(dir.path(), &["run"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("Q29"), "stderr: {stderr}");
    assert!(!dir.path().join("output").exists());
}

#[test]
fn plan_command_prints_the_built_in_plan() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_binary(dir.path(), &["plan", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("plan json");
    assert_eq!(plan["outcome"]["field"], "Q29");
}
