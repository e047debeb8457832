//! End-to-end tests of the `pennyplan` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "projects": [
        {
            "name": "Wedding",
            "budget": 5000,
            "plan_type": "savings",
            "categories": [
                { "name": "Venue", "budget": 3000,
                  "expenses": [{ "name": "Deposit", "amount": 1000 }, { "name": "Balance", "amount": 1500 }] },
                { "name": "Music", "budget": 1500,
                  "expenses": [{ "name": "Band", "amount": 2000 }] }
            ]
        },
        {
            "name": "Car",
            "budget": 5000,
            "plan_type": "investment",
            "categories": [
                { "name": "Repairs", "budget": 5000,
                  "expenses": [{ "name": "Engine", "amount": 5200 }] }
            ]
        }
    ]
}"#;

/// Command with an empty config directory and a clean environment.
fn pennyplan(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pennyplan").unwrap();
    cmd.arg("--config-dir")
        .arg(config_dir)
        .env_remove("RUST_LOG")
        .env_remove("PENNYPLAN__ALLOCATION__ENDPOINT")
        .env("RUN_MODE", "test");
    cmd
}

fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn targets(json: &Value) -> Vec<i64> {
    json["schedule"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["ideal_target"].as_i64().unwrap())
        .collect()
}

#[test]
fn test_plan_savings_schedule() {
    let dir = TempDir::new().unwrap();
    let output = pennyplan(dir.path())
        .args(["plan", "--goal", "1000", "--months", "3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(targets(&json), vec![333, 333, 334]);
    assert_eq!(json["plan"]["plan_type"], "savings");
}

#[test]
fn test_plan_with_logged_month() {
    let dir = TempDir::new().unwrap();
    let output = pennyplan(dir.path())
        .args(["plan", "--goal", "1000", "--months", "3", "--actual", "1=400"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["schedule"][0]["pace_status"], "ahead");
    assert!(json["schedule"][1]["pace_status"].is_null());
    assert_eq!(json["chart"]["actuals"].as_array().unwrap().len(), 1);
}

#[test]
fn test_plan_rebalance() {
    let dir = TempDir::new().unwrap();
    let output = pennyplan(dir.path())
        .args([
            "plan", "--goal", "1200", "--months", "4", "--actual", "1=100", "--rebalance",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(targets(&stdout_json(&output)), vec![300, 366, 367, 367]);
}

#[test]
fn test_plan_goal_in_major_units() {
    let dir = TempDir::new().unwrap();
    let output = pennyplan(dir.path())
        .args(["plan", "--goal-major", "10.005", "--months", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["goal"], 1001);
    assert_eq!(targets(&json), vec![500, 501]);
}

#[test]
fn test_plan_investment_text_output() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args([
            "plan", "--goal", "30000", "--months", "3", "--plan-type", "investment",
            "--annual-rate", "0.12", "--format", "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("investment plan: 300.00 USD over 3 months"))
        .stdout(predicate::str::contains("Month   3"));
}

#[test]
fn test_plan_zero_months_fails() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["plan", "--goal", "1000", "--months", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("months must be at least 1"));
}

#[test]
fn test_plan_negative_goal_fails() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["plan", "--goal", "-5", "--months", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goal amount cannot be negative"));
}

#[test]
fn test_plan_unknown_type_fails() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["plan", "--goal", "1000", "--months", "3", "--plan-type", "lottery"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plan type: lottery"));
}

#[test]
fn test_plan_negative_actual_fails() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["plan", "--goal", "1000", "--months", "3", "--actual", "2=-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));
}

#[test]
fn test_plan_uses_configured_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("default.toml"),
        "[plan]\nannual_rate = \"0.10\"\nsavings_share_percent = 20\n",
    )
    .unwrap();

    let output = pennyplan(dir.path())
        .args(["plan", "--goal", "1000", "--months", "2", "--plan-type", "hybrid"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["plan"]["annual_rate"], "0.10");
    assert_eq!(json["plan"]["savings_share_percent"], 20);
}

#[test]
fn test_report_allocates_and_flags_overspend() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);

    let output = pennyplan(dir.path())
        .arg("report")
        .arg("--snapshot")
        .arg(&snapshot)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 2);

    let wedding = &reports[0];
    assert_eq!(wedding["summary"]["consumed"], 4500);
    assert_eq!(wedding["summary"]["remainder"], 500);
    assert_eq!(wedding["summary"]["categories"][0]["status"], "warning");
    assert_eq!(wedding["summary"]["categories"][1]["status"], "danger");
    assert_eq!(
        wedding["allocation"],
        serde_json::json!([
            {"name": "reserve", "value": 350},
            {"name": "emergency", "value": 150}
        ])
    );

    let car = &reports[1];
    assert_eq!(
        car["allocation"],
        serde_json::json!([{"name": "overspent", "value": 200}])
    );
}

#[test]
fn test_report_single_project_as_text() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);

    pennyplan(dir.path())
        .arg("report")
        .arg("--snapshot")
        .arg(&snapshot)
        .args(["--project", "Wedding", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wedding [savings]"))
        .stdout(predicate::str::contains("remainder 5.00 USD"))
        .stdout(predicate::str::contains("allocation: reserve 3.50 USD, emergency 1.50 USD"))
        .stdout(predicate::str::contains("Car").not());
}

#[test]
fn test_report_unknown_project_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);

    pennyplan(dir.path())
        .arg("report")
        .arg("--snapshot")
        .arg(&snapshot)
        .args(["--project", "Boat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project named 'Boat'"));
}

#[test]
fn test_report_missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["report", "--snapshot"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read snapshot"));
}

#[test]
fn test_report_degrades_when_remote_strategy_unreachable() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);

    let output = pennyplan(dir.path())
        .env("PENNYPLAN__ALLOCATION__ENDPOINT", "http://127.0.0.1:1/allocate")
        .env("PENNYPLAN__ALLOCATION__TIMEOUT_SECS", "2")
        .arg("report")
        .arg("--snapshot")
        .arg(&snapshot)
        .args(["--project", "Wedding"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(
        json[0]["allocation"],
        serde_json::json!([{"name": "unallocated", "value": 500}])
    );
    assert!(json[0]["allocation_error"].is_string());
}

#[test]
fn test_report_total_overflow_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.json");
    std::fs::write(
        &path,
        r#"{"projects": [{"name": "Huge", "budget": 1, "plan_type": "savings",
            "categories": [{"name": "All", "budget": 1, "expenses": [
                {"name": "a", "amount": 9223372036854775807},
                {"name": "b", "amount": 1}]}]}]}"#,
    )
    .unwrap();

    pennyplan(dir.path())
        .arg("report")
        .arg("--snapshot")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to summarize project 'Huge'"))
        .stderr(predicate::str::contains("amount overflow"));
}

#[test]
fn test_plan_logged_total_overflow_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["plan", "--goal", "10", "--months", "2"])
        .args(["--actual", "1=9223372036854775807", "--actual", "2=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount overflow"));
}

#[test]
fn test_plan_months_ceiling() {
    let dir = TempDir::new().unwrap();
    pennyplan(dir.path())
        .args(["plan", "--goal", "1", "--months", "4000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("months must be at most 1200"));

    pennyplan(dir.path())
        .args(["plan", "--goal", "1200", "--months", "1200"])
        .assert()
        .success();
}
