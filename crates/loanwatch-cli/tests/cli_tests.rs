//! End-to-end tests for the `loanwatch` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const PORTFOLIO_CSV: &str = "\
report_dt,credit_type,cur_default,default_12m,default_reason,rating
2019-01-31,A,0,0,,5
2019-01-31,B,1,1,X,3
2019-02-28,A,0,0,,5
";

fn portfolio_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(PORTFOLIO_CSV.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn loanwatch(file: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("loanwatch").unwrap();
    cmd.env_remove("LOANWATCH_DATA")
        .arg("--data")
        .arg(file.path());
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_catalog_table() {
    let file = portfolio_file();
    loanwatch(&file)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("product_type"))
        .stdout(predicate::str::contains("2019-02-28"));
}

#[test]
fn test_catalog_json() {
    let file = portfolio_file();
    let json = json_output(loanwatch(&file).args(["--format", "json", "catalog"]));

    assert_eq!(json["product_types"], serde_json::json!(["A", "B"]));
    assert_eq!(json["default_reasons"], serde_json::json!(["X"]));
    assert_eq!(json["row_count"], 3);
    assert_eq!(json["default_selection"]["end_period"], "2019-03-01");
}

#[test]
fn test_stats_json() {
    let file = portfolio_file();
    let json = json_output(loanwatch(&file).args(["--format", "json", "stats"]));

    assert_eq!(json["count"], 3);
    assert_eq!(json["defaults_count"], 1);
    let rate = json["event_rate"].as_f64().unwrap();
    assert!((rate - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_stats_with_filters() {
    let file = portfolio_file();
    let json = json_output(loanwatch(&file).args([
        "--format", "json", "stats", "--product", "A", "--from", "2019-02-01",
    ]));

    assert_eq!(json["count"], 1);
    assert_eq!(json["defaults_count"], 0);
}

#[test]
fn test_stats_state_filter_table() {
    let file = portfolio_file();
    loanwatch(&file)
        .args(["stats", "--state", "defaulted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00%"));
}

#[test]
fn test_counts_csv() {
    let file = portfolio_file();
    loanwatch(&file)
        .args(["--format", "csv", "counts", "--decompose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("period,product,count"))
        .stdout(predicate::str::contains("2019-01-31,B,1"))
        .stdout(predicate::str::contains("2019-02-28,A,1"));
}

#[test]
fn test_ratings_json() {
    let file = portfolio_file();
    let json = json_output(loanwatch(&file).args(["--format", "json", "ratings"]));

    assert_eq!(json["by_rating"]["3"], 1);
    assert_eq!(json["by_rating"]["5"], 2);
}

#[test]
fn test_default_rate_csv() {
    let file = portfolio_file();
    loanwatch(&file)
        .args(["--format", "csv", "default-rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("period,product,default_rate"))
        .stdout(predicate::str::contains("2019-01-31,all,0.5"));
}

#[test]
fn test_default_rate_empty_selection_fails() {
    let file = portfolio_file();
    loanwatch(&file)
        .args(["default-rate", "--from", "2019-02-28", "--to", "2019-02-28"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No rows match"));
}

#[test]
fn test_invalid_date() {
    let file = portfolio_file();
    loanwatch(&file)
        .args(["stats", "--from", "01/02/2019"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn test_unknown_product_rejected() {
    let file = portfolio_file();
    loanwatch(&file)
        .args(["stats", "--product", "Leasing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Leasing"));
}

#[test]
fn test_missing_data_file() {
    Command::cargo_bin("loanwatch")
        .unwrap()
        .env_remove("LOANWATCH_DATA")
        .args(["--data", "/nonexistent/portfolio.csv", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_data_from_environment() {
    let file = portfolio_file();
    let output = Command::cargo_bin("loanwatch")
        .unwrap()
        .env("LOANWATCH_DATA", file.path())
        .args(["--format", "json", "stats"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["count"], 3);
}
