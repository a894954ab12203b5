//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against the given data directory.
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "pomoplan-cli", "--quiet", "--"])
        .args(args)
        .env("POMOPLAN_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(dir.path(), &["task", "add", "Write the quarterly report"]);
    assert_eq!(code, 0, "task add failed: {stderr}");
    assert!(stdout.contains("Task created:"));

    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Write the quarterly report");
    assert_eq!(tasks[0]["status"], "pending");
}

#[test]
fn test_task_add_runs_the_estimator() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "task",
            "add",
            "Research and implement the complex import pipeline",
        ],
    );
    assert_eq!(code, 0);
    let json_start = stdout.find('{').unwrap();
    let task: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    // 7 words -> base 1; research (1.3), implement (1.2), complex (1.5)
    // stack to 2.34 -> 3.
    assert_eq!(task["estimated_pomodoros"], 3);
}

#[test]
fn test_task_estimate_is_clamped_for_short_text() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["task", "estimate", "quick email"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1");
}

#[test]
fn test_timer_status_starts_ready() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["state"], "ready");
    assert_eq!(snapshot["phase"], "work");
    assert_eq!(snapshot["display"], "25:00");
}

#[test]
fn test_timer_start_then_pause() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("phase_started"));

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "pause"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("timer_paused"));

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["state"], "paused");
}

#[test]
fn test_timer_skip_moves_to_a_break() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "skip"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("phase_completed"));

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["phase"], "short_break");
    assert_eq!(snapshot["state"], "ready");
}

#[test]
fn test_timer_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("timer_reset"));
}

#[test]
fn test_timer_select_phase() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["timer", "select", "long-break"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["phase"], "long_break");
    assert_eq!(snapshot["display"], "15:00");
}

#[test]
fn test_skipped_work_phase_credits_the_bound_task() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["task", "add", "One shot task", "--estimate", "1"],
    );
    assert_eq!(code, 0);
    let json_start = stdout.find('{').unwrap();
    let task: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    let task_id = task["id"].as_str().unwrap();

    let (code, _, _) = run_cli(dir.path(), &["task", "use", task_id]);
    assert_eq!(code, 0);
    let (code, _, _) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    let (code, _, _) = run_cli(dir.path(), &["timer", "skip"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["task", "get", task_id]);
    assert_eq!(code, 0);
    let task: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(task["completed_pomodoros"], 1);
    assert_eq!(task["status"], "completed");

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "all"]);
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["completed_pomodoros"], 1);
    assert_eq!(stats["completed_tasks"], 1);
}

#[test]
fn test_settings_show_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["settings", "show"]);
    assert_eq!(code, 0);
    let settings: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(settings["work_secs"], 1500);
    assert_eq!(settings["long_break_cadence"], 4);

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["settings", "set", "--work-secs", "3000", "--cadence", "2"],
    );
    assert_eq!(code, 0);
    let settings: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(settings["work_secs"], 3000);
    assert_eq!(settings["long_break_cadence"], 2);
}

#[test]
fn test_settings_reject_zero_cadence() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["settings", "set", "--cadence", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("cadence"));
}

#[test]
fn test_stats_start_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["stats", "today"]);
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["completed_pomodoros"], 0);

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "week"]);
    assert_eq!(code, 0);
    let week: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(week.as_array().unwrap().len(), 7);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "estimator.auto"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "estimator.auto", "false"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "estimator.auto"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_auth_profiles_scope_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["auth", "whoami"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "local");

    let (code, _, _) = run_cli(dir.path(), &["task", "add", "local task"]);
    assert_eq!(code, 0);

    let (code, _, _) = run_cli(dir.path(), &["auth", "login", "ada@example.com"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["auth", "whoami"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ada@example.com");

    // Ada sees none of the local profile's tasks.
    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(tasks.as_array().unwrap().is_empty());

    let (code, _, _) = run_cli(dir.path(), &["auth", "logout"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}
