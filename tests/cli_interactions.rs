//! CLI options interaction tests
//!
//! These tests run the `usl` binary against measurement files and check
//! output, exit codes and configuration layering.

use predicates::prelude::*;
use std::fs;
use assert_cmd::Command;
use tempfile::TempDir;
use usl_planner::Model;

const INHERITED_ENV_VARS: &[&str] = &[
    "USL_COLUMNS",
    "USL_FORMAT",
    "USL_PREDICT",
    "USL_ENABLE_COLOR",
    "FORCE_COLOR",
    "CLICOLOR_FORCE",
];

/// Command running inside `dir` with no inherited USL_* or color settings
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("usl").unwrap();
    cmd.current_dir(dir.path());
    for var in INHERITED_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn measurements_csv(model: &Model, levels: &[f64]) -> String {
    let mut csv = String::from("concurrency,throughput\n");
    for &n in levels {
        csv.push_str(&format!("{},{}\n", n, model.throughput_at_concurrency(n)));
    }
    csv
}

/// Temp dir holding `bench.csv` with noise-free measurements of σ=0.05, κ=0.002, λ=40
fn bench_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let model = Model::new(0.05, 0.002, 40.0);
    fs::write(
        dir.path().join("bench.csv"),
        measurements_csv(&model, &[1.0, 2.0, 4.0, 8.0, 16.0, 32.0]),
    )
    .unwrap();
    dir
}

#[test]
fn test_fit_text_report() {
    let dir = bench_dir();
    create_test_cmd(&dir)
        .arg("bench.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("Universal Scalability Law Fit"))
        .stdout(predicate::str::contains("Max concurrency:    21"))
        .stdout(predicate::str::contains("Contention"))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_json_output() {
    let dir = bench_dir();
    let output = create_test_cmd(&dir)
        .args(["bench.csv", "--format", "json", "--predict", "64"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["sample_count"], 6);
    assert_eq!(value["max_concurrency"], 21.0);
    assert!((value["model"]["sigma"].as_f64().unwrap() - 0.05).abs() < 1e-6);
    assert_eq!(value["predictions"][0]["concurrency"], 64.0);
}

#[test]
fn test_predictions_and_verbose_sections() {
    let dir = bench_dir();
    create_test_cmd(&dir)
        .args(["bench.csv", "--predict", "24,48", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Predictions:"))
        .stdout(predicate::str::contains("Residuals:"))
        .stderr(predicate::str::contains("Parsed 6 measurements"));
}

#[test]
fn test_stdin_input() {
    let dir = TempDir::new().unwrap();
    let model = Model::new(0.1, 0.01, 20.0);
    create_test_cmd(&dir)
        .arg("-")
        .write_stdin(measurements_csv(&model, &[1.0, 2.0, 3.0, 4.0, 6.0, 8.0]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Max concurrency:    9"));
}

#[test]
fn test_insufficient_data_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("short.csv"), "1,10\n2,19\n4,35\n").unwrap();

    create_test_cmd(&dir)
        .arg("short.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("needs at least 6 measurements, got 3"));
}

#[test]
fn test_too_few_levels_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("flat.csv"), "1,10\n10,90\n1,10\n10,90\n1,10\n10,90\n").unwrap();

    create_test_cmd(&dir)
        .arg("flat.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("3 distinct concurrency levels"));
}

#[test]
fn test_negative_measurement_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("neg.csv"),
        "-1,65\n2,108\n4,162\n8,222\n16,253\n32,257\n",
    )
    .unwrap();

    create_test_cmd(&dir)
        .args(["neg.csv", "--no-color"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("zero, negative or non-finite"));
}

#[test]
fn test_negative_throughput_json_exit_code() {
    let dir = bench_dir();
    fs::write(
        dir.path().join("neg.csv"),
        "1,65\n2,108\n4,162\n8,222\n16,253\n32,-257\n",
    )
    .unwrap();

    create_test_cmd(&dir)
        .args(["neg.csv", "--format", "json"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_malformed_row_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.csv"), "1,10\n2,19\n4,lots\n").unwrap();

    create_test_cmd(&dir)
        .arg("bad.csv")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_wrong_field_count_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("wide.csv"), "1,10,0.1\n").unwrap();

    create_test_cmd(&dir)
        .arg("wide.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exactly 2 elements"));
}

#[test]
fn test_missing_file_exit_code() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("nowhere.csv")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("nowhere.csv"));
}

#[test]
fn test_missing_input_argument() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Must specify an input file"));
}

#[test]
fn test_conflicting_color_flags() {
    let dir = bench_dir();
    create_test_cmd(&dir)
        .args(["bench.csv", "--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color and --no-color"));
}

#[test]
fn test_invalid_columns_rejected_by_parser() {
    let dir = bench_dir();
    create_test_cmd(&dir)
        .args(["bench.csv", "--columns", "latency"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid column pair"));
}

#[test]
fn test_env_file_sets_format() {
    let dir = bench_dir();
    fs::write(dir.path().join(".env"), "USL_FORMAT=json\n").unwrap();

    create_test_cmd(&dir)
        .arg("bench.csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));

    // CLI flag wins over the .env file
    create_test_cmd(&dir)
        .args(["bench.csv", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Universal Scalability Law Fit"));
}

#[test]
fn test_environment_variable_columns() {
    let dir = TempDir::new().unwrap();
    let model = Model::new(0.05, 0.002, 40.0);
    let rows: String = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0]
        .iter()
        .map(|&n| format!("{} {}\n", n, model.latency_at_concurrency(n)))
        .collect();
    fs::write(dir.path().join("latency.txt"), rows).unwrap();

    create_test_cmd(&dir)
        .env("USL_COLUMNS", "concurrency-latency")
        .arg("latency.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("Max concurrency:    21"));
}

#[test]
fn test_invalid_environment_value() {
    let dir = bench_dir();
    create_test_cmd(&dir)
        .env("USL_PREDICT", "many")
        .arg("bench.csv")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("USL_PREDICT"));
}

#[test]
fn test_help_topic() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--help-topic", "model", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contention"))
        .stdout(predicate::str::contains("limitless"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
