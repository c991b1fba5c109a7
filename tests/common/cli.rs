//! Isolated workspaces and a runner for the `kb` binary.

use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A temporary workspace root. `kb` runs with it as the working directory.
pub struct KbWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl KbWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Directory holding the default team's snapshot.
    pub fn team_dir(&self) -> PathBuf {
        self.root.join(".kanban").join("default")
    }

    /// Write `statuses.jsonl` and `tasks.jsonl` for the default team.
    pub fn seed(&self, statuses: &[Value], tasks: &[Value]) {
        let dir = self.team_dir();
        fs::create_dir_all(&dir).expect("create team dir");
        fs::write(dir.join("statuses.jsonl"), to_jsonl(statuses)).expect("write statuses");
        fs::write(dir.join("tasks.jsonl"), to_jsonl(tasks)).expect("write tasks");
    }

    /// Parsed lines of one of the default team's snapshot files.
    pub fn read_jsonl(&self, file: &str) -> Vec<Value> {
        let raw = fs::read_to_string(self.team_dir().join(file)).expect("read snapshot");
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("parse snapshot line"))
            .collect()
    }
}

fn to_jsonl(values: &[Value]) -> String {
    values.iter().map(|v| format!("{v}\n")).collect()
}

pub struct KbOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl KbOutput {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}

/// A `kb` command rooted in the workspace with a clean environment.
pub fn kb_command(workspace: &KbWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("kb").expect("kb binary");
    cmd.current_dir(&workspace.root)
        .env_remove("KANBAN_TEAM")
        .env_remove("KANBAN_DATA_DIR")
        .env_remove("KANBAN_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `kb` in the workspace with a clean environment.
pub fn run_kb<I, S>(workspace: &KbWorkspace, args: I, label: &str) -> KbOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = kb_command(workspace)
        .args(args)
        .output()
        .expect("run kb");
    let result = KbOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] kb failed:\n{}", result.stderr);
    }
    result
}
