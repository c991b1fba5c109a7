mod common;

use common::cli::{KbWorkspace, kb_command, run_kb};
use predicates::prelude::*;
use serde_json::{Value, json};

fn seed_board(workspace: &KbWorkspace) {
    workspace.seed(
        &[
            json!({"id": "s1", "name": "Todo", "order": 0}),
            json!({"id": "s2", "name": "Doing", "order": 1}),
            json!({"id": "s3", "name": "Done", "order": 2}),
        ],
        &[
            json!({
                "id": "t1", "title": "Fix login", "taskStatusId": "s1", "status": "Todo",
                "priority": "High", "tags": [{"id": "l1", "name": "auth"}],
                "members": [{"id": "e1", "fullName": "Ada"}]
            }),
            json!({
                "id": "t2", "title": "Write docs", "taskStatusId": "s1", "status": "Todo",
                "priority": "Low", "size": "Small"
            }),
            json!({
                "id": "t3", "title": "Ship release", "taskStatusId": "s3", "status": "Done",
                "estimate": 3600
            }),
            json!({"id": "t4", "title": "Orphan", "taskStatusId": "gone"}),
        ],
    );
}

fn column_tasks(board: &Value, name: &str) -> Vec<String> {
    board["columns"]
        .as_array()
        .expect("columns array")
        .iter()
        .find(|c| c["name"] == name)
        .unwrap_or_else(|| panic!("column {name} missing"))["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|t| t["id"].as_str().expect("task id").to_string())
        .collect()
}

#[test]
fn test_board_json_groups_tasks_by_column() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);

    let output = run_kb(&workspace, ["board", "--json"], "board");
    assert!(output.status.success());
    let board = output.json();

    assert_eq!(board["team"], "default");
    let names: Vec<_> = board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Todo", "Doing", "Done"]);
    assert_eq!(column_tasks(&board, "Todo"), vec!["t1", "t2"]);
    assert!(column_tasks(&board, "Doing").is_empty());
    assert_eq!(column_tasks(&board, "Done"), vec!["t3"]);
    assert_eq!(board["columns"][2]["totalEstimate"], 3600);
}

#[test]
fn test_board_text_output() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);

    let output = run_kb(&workspace, ["board"], "board_text");
    assert!(output.status.success());
    assert!(output.stdout.contains("▾ Todo (2)"));
    assert!(output.stdout.contains("t1 [High] Fix login #auth @Ada"));
    assert!(output.stdout.contains("▾ Done (1) · 1h 00m"));
    assert!(!output.stdout.contains("Orphan"));
}

#[test]
fn test_default_command_shows_board() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);

    let output = run_kb(&workspace, std::iter::empty::<&str>(), "no_command");
    assert!(output.status.success());
    assert!(output.stdout.contains("Todo (2)"));
}

#[test]
fn test_board_priority_filter_keeps_empty_columns() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);

    let output = run_kb(&workspace, ["board", "-p", "high", "--json"], "priority");
    assert!(output.status.success());
    let board = output.json();
    assert_eq!(column_tasks(&board, "Todo"), vec!["t1"]);
    assert!(column_tasks(&board, "Done").is_empty());
    assert_eq!(board["columns"].as_array().unwrap().len(), 3);
}

#[test]
fn test_board_filters_combine() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);

    let by_label = run_kb(&workspace, ["board", "--label", "auth", "--json"], "label");
    assert_eq!(column_tasks(&by_label.json(), "Todo"), vec!["t1"]);

    let by_search = run_kb(&workspace, ["board", "-s", "DOCS", "--json"], "search");
    assert_eq!(column_tasks(&by_search.json(), "Todo"), vec!["t2"]);

    let none = run_kb(
        &workspace,
        ["board", "-s", "docs", "--label", "auth", "--json"],
        "both",
    );
    assert!(column_tasks(&none.json(), "Todo").is_empty());

    let by_member = run_kb(&workspace, ["board", "--employee", "Ada", "--json"], "member");
    assert_eq!(column_tasks(&by_member.json(), "Todo"), vec!["t1"]);

    let by_epic = run_kb(&workspace, ["board", "--epic", "t3", "--json"], "epic");
    assert_eq!(column_tasks(&by_epic.json(), "Done"), vec!["t3"]);
    assert!(column_tasks(&by_epic.json(), "Todo").is_empty());
}

#[test]
fn test_empty_team_suggests_init() {
    let workspace = KbWorkspace::new();

    let output = run_kb(&workspace, ["board"], "empty");
    assert!(output.status.success());
    assert!(output.stdout.contains("kb init"));
}

#[test]
fn test_invalid_snapshot_fails() {
    let workspace = KbWorkspace::new();
    workspace.seed(
        &[
            json!({"id": "s1", "name": "Todo"}),
            json!({"id": "s2", "name": "Todo"}),
        ],
        &[],
    );

    let output = run_kb(&workspace, ["board"], "dup_columns");
    assert!(!output.status.success());
    assert!(output.stderr.contains("Duplicate column name"));
}

#[test]
fn test_version_json() {
    let workspace = KbWorkspace::new();

    let output = run_kb(&workspace, ["version", "--json"], "version");
    assert!(output.status.success());
    let version = output.json();
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
    assert!(version["core"].is_string());
}

#[test]
fn test_env_selects_team_and_data_dir() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);
    let data_dir = workspace.root.join("elsewhere");
    std::fs::create_dir_all(data_dir.join("ops")).unwrap();
    std::fs::copy(
        workspace.team_dir().join("statuses.jsonl"),
        data_dir.join("ops").join("statuses.jsonl"),
    )
    .unwrap();

    kb_command(&workspace)
        .env("KANBAN_TEAM", "ops")
        .env("KANBAN_DATA_DIR", &data_dir)
        .args(["board", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"team\": \"ops\""))
        .stdout(predicate::str::contains("Fix login").not());

    // Flags beat the environment
    kb_command(&workspace)
        .env("KANBAN_TEAM", "ops")
        .args(["--team", "default", "board"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix login"));
}

#[test]
fn test_log_file_receives_json_lines() {
    let workspace = KbWorkspace::new();
    seed_board(&workspace);
    let log_path = workspace.root.join("kb.log");

    kb_command(&workspace)
        .args(["-v", "--log-file"])
        .arg(&log_path)
        .args(["collapse", "Done"])
        .assert()
        .success()
        .stderr(predicate::str::contains("column updated"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    let first: Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
    assert!(first["level"].is_string());
    assert!(log.contains("column updated"));
}

#[test]
fn test_unknown_priority_flag_value_is_rejected() {
    let workspace = KbWorkspace::new();

    kb_command(&workspace)
        .args(["board", "--priority", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
