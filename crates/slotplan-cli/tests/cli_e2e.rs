//! CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_slotplan"))
        .env("SLOTPLAN_HOME", home)
        .env_remove("SLOTPLAN_LOG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed {:?}: {}", args, stderr);
    stdout
}

fn write_tasks(path: &Path, json: &str) {
    std::fs::write(path, json).unwrap();
}

#[test]
fn test_schedule_build_json() {
    let home = tempfile::tempdir().unwrap();
    let tasks = home.path().join("tasks.json");
    write_tasks(
        &tasks,
        r#"[
            {"id":"a","name":"Essay","dueDate":"2025-02-05","requiredTime":2,"priority":"high","progress":0},
            {"id":"b","name":"Reading","dueDate":"2025-02-03","requiredTime":10,"priority":"low","progress":0}
        ]"#,
    );

    let stdout = run_cli_success(
        home.path(),
        &[
            "schedule", "build",
            "--tasks", tasks.to_str().unwrap(),
            "--anchor", "2025-02-05",
            "--json",
        ],
    );
    let out: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let days = out["grid"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 14);
    assert_eq!(days[0]["date"], "2025-02-02");
    assert_eq!(days[0]["slots"].as_array().unwrap().len(), 4);
    assert_eq!(days[0]["slots"][0]["task_id"], "a");
    assert_eq!(days[0]["slots"][2]["task_id"], "b");

    let shortfalls = out["shortfalls"].as_array().unwrap();
    assert_eq!(shortfalls.len(), 1);
    assert_eq!(shortfalls[0]["task_id"], "b");
    assert_eq!(shortfalls[0]["unscheduled_hours"], 4.0);
}

#[test]
fn test_schedule_build_table_hourly_with_commitment() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["config", "set", "schedule.wake_time", "09:00"]);
    run_cli_success(home.path(), &["config", "set", "schedule.bed_time", "12:00"]);
    run_cli_success(
        home.path(),
        &[
            "config", "set", "fixed_schedules",
            r#"[{"id":"class","when":{"day_of_week":"Sun"},"start_time":"09:00","end_time":"10:00"}]"#,
        ],
    );

    let tasks = home.path().join("tasks.json");
    write_tasks(
        &tasks,
        r#"[{"id":"a","name":"Essay","due_date":"2025-02-02","required_hours":1,"priority":"high"}]"#,
    );

    let stdout = run_cli_success(
        home.path(),
        &[
            "schedule", "build",
            "--tasks", tasks.to_str().unwrap(),
            "--anchor", "2025-02-02",
            "--variant", "hourly",
        ],
    );
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(lines[0].starts_with("Time"));
    assert!(lines[1].starts_with("09:00"));
    assert!(lines[1].contains("[fixed]"));
    assert!(lines[2].starts_with("10:00"));
    assert!(lines[2].contains("Essay"));
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_task_add_progress_and_remove() {
    let home = tempfile::tempdir().unwrap();
    let tasks = home.path().join("tasks.json");
    let file = tasks.to_str().unwrap();

    let stdout = run_cli_success(
        home.path(),
        &["task", "add", file, "Lab report", "--due", "2025-03-01", "--hours", "3", "--priority", "high"],
    );
    assert!(stdout.contains("Task created:"));

    let listed: serde_json::Value =
        serde_json::from_str(&run_cli_success(home.path(), &["task", "list", file])).unwrap();
    let id = listed[0]["id"].as_str().unwrap().to_string();
    assert_eq!(listed[0]["priority"], "high");
    assert_eq!(listed[0]["progress"], 0);

    let stdout = run_cli_success(home.path(), &["task", "progress", file, &id, "100"]);
    assert!(stdout.contains("points: +10"));

    let listed: serde_json::Value =
        serde_json::from_str(&run_cli_success(home.path(), &["task", "list", file])).unwrap();
    assert_eq!(listed[0]["progress"], 100);

    run_cli_success(home.path(), &["task", "remove", file, &id]);
    let listed: serde_json::Value =
        serde_json::from_str(&run_cli_success(home.path(), &["task", "list", file])).unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_inputs_fail() {
    let home = tempfile::tempdir().unwrap();
    let tasks = home.path().join("tasks.json");
    let file = tasks.to_str().unwrap();

    let (_, stderr, code) = run_cli(
        home.path(),
        &["task", "add", file, "Bad", "--due", "tomorrow", "--hours", "2"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("due_date"));

    let (_, _, code) = run_cli(home.path(), &["config", "set", "schedule.slot_minutes", "45"]);
    assert_ne!(code, 0);

    let (_, _, code) = run_cli(home.path(), &["config", "get", "schedule.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set_reset() {
    let home = tempfile::tempdir().unwrap();

    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "schedule.slot_minutes"]).trim(),
        "60"
    );
    run_cli_success(home.path(), &["config", "set", "schedule.slot_minutes", "30"]);
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "schedule.slot_minutes"]).trim(),
        "30"
    );
    run_cli_success(home.path(), &["config", "reset"]);
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "schedule.slot_minutes"]).trim(),
        "60"
    );
}

#[test]
fn test_commitment_commands_block_overlapping_slots() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["config", "set", "schedule.wake_time", "09:00"]);
    run_cli_success(home.path(), &["config", "set", "schedule.bed_time", "12:00"]);

    let stdout = run_cli_success(
        home.path(),
        &["config", "commitment", "add", "09:30", "10:30", "--day", "sun", "--id", "class", "--label", "Lecture"],
    );
    assert!(stdout.contains("Commitment added: class"));

    let (_, _, code) = run_cli(
        home.path(),
        &["config", "commitment", "add", "11:00", "12:00", "--day", "sun", "--id", "class"],
    );
    assert_ne!(code, 0);

    let listed = run_cli_success(home.path(), &["config", "commitment", "list"]);
    assert_eq!(listed.trim(), "class  every Sun  09:30-10:30  Lecture");

    let tasks = home.path().join("tasks.json");
    write_tasks(
        &tasks,
        r#"[{"id":"a","name":"Essay","due_date":"2025-02-02","required_hours":1,"priority":"high"}]"#,
    );
    let stdout = run_cli_success(
        home.path(),
        &[
            "schedule", "build",
            "--tasks", tasks.to_str().unwrap(),
            "--anchor", "2025-02-02",
            "--variant", "hourly",
            "--json",
        ],
    );
    let out: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sunday = &out["grid"]["days"][0]["slots"];
    assert_eq!(sunday[0]["fixed"], true);
    assert_eq!(sunday[1]["fixed"], true);
    assert_eq!(sunday[2]["task_id"], "a");

    run_cli_success(home.path(), &["config", "commitment", "remove", "class"]);
    assert!(run_cli_success(home.path(), &["config", "commitment", "list"]).trim().is_empty());
    let (_, _, code) = run_cli(home.path(), &["config", "commitment", "remove", "class"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_rejects_windows_that_cannot_be_scheduled() {
    let home = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "schedule.daily_ideal_hours", "30"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("window"));

    run_cli_success(home.path(), &["config", "set", "schedule.wake_time", "22:00"]);
    let (_, _, code) = run_cli(home.path(), &["config", "set", "schedule.bed_time", "02:00"]);
    assert_ne!(code, 0);
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "schedule.bed_time"]).trim(),
        "null"
    );
}

#[test]
fn test_task_list_open_hides_completed() {
    let home = tempfile::tempdir().unwrap();
    let tasks = home.path().join("tasks.json");
    write_tasks(
        &tasks,
        r#"[
            {"id":"a","name":"Essay","due_date":"2025-02-05","required_hours":2,"progress":100},
            {"id":"b","name":"Reading","due_date":"2025-02-06","required_hours":1,"progress":40}
        ]"#,
    );
    let file = tasks.to_str().unwrap();

    let all: serde_json::Value =
        serde_json::from_str(&run_cli_success(home.path(), &["task", "list", file])).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let open: serde_json::Value =
        serde_json::from_str(&run_cli_success(home.path(), &["task", "list", file, "--open"])).unwrap();
    let open = open.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["id"], "b");
}
