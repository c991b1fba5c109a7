//! In-memory task and status store keyed by team.
//!
//! Implements both source traits so an engine can run without a server.
//! Use `open()` to load a team from a data directory and `save()` to
//! persist every loaded team back.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{KanbanError, Result};
use crate::jsonl;
use crate::model::{MutationOutcome, Status, StatusPatch, Task};
use crate::source::{StatusSource, TaskSource};
use crate::validation::{StatusValidator, TaskValidator};

const TASKS_FILE: &str = "tasks.jsonl";
const STATUSES_FILE: &str = "statuses.jsonl";

#[derive(Debug, Clone, Default)]
struct TeamData {
    tasks: Vec<Task>,
    statuses: Vec<Status>,
}

/// In-memory kanban store.
pub struct MemoryStore {
    teams: Mutex<HashMap<String, TeamData>>,
    data_dir: Option<PathBuf>,
}

impl MemoryStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(HashMap::new()),
            data_dir: None,
        }
    }

    /// Open a store and load one team from `<data_dir>/<team_id>/`.
    ///
    /// Missing snapshot files load as an empty board.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or if the loaded
    /// data fails validation.
    pub fn open(data_dir: impl AsRef<Path>, team_id: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let team_dir = data_dir.join(team_id);

        let statuses = or_empty(jsonl::load_statuses(&team_dir.join(STATUSES_FILE)))?;
        let tasks = or_empty(jsonl::load_tasks(&team_dir.join(TASKS_FILE)))?;
        StatusValidator::validate_registry(&statuses)?;
        TaskValidator::validate_collection(&tasks)?;

        debug!(
            team = team_id,
            statuses = statuses.len(),
            tasks = tasks.len(),
            "team loaded"
        );

        let store = Self {
            teams: Mutex::new(HashMap::new()),
            data_dir: Some(data_dir.to_path_buf()),
        };
        store
            .teams()
            .insert(team_id.to_string(), TeamData { tasks, statuses });
        Ok(store)
    }

    /// Save every team to the directory the store was opened from.
    ///
    /// # Errors
    ///
    /// Returns `Config` if no data directory is set, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let data_dir = self.data_dir.as_ref().ok_or_else(|| {
            KanbanError::Config("No data directory set; use save_to()".to_string())
        })?;
        self.save_to(data_dir)
    }

    /// Save every team under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save_to(&self, data_dir: impl AsRef<Path>) -> Result<()> {
        let teams = self.teams().clone();
        for (team_id, data) in &teams {
            let team_dir = data_dir.as_ref().join(team_id);
            jsonl::save_statuses(&team_dir.join(STATUSES_FILE), &data.statuses)?;
            jsonl::save_tasks(&team_dir.join(TASKS_FILE), &data.tasks)?;
        }
        Ok(())
    }

    fn teams(&self) -> MutexGuard<'_, HashMap<String, TeamData>> {
        self.teams.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Add a column to a team's registry.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or `DuplicateColumnName` if the team
    /// already has a column with this name.
    pub fn insert_status(&self, team_id: &str, status: Status) -> Result<()> {
        let mut teams = self.teams();
        let team = teams.entry(team_id.to_string()).or_default();
        let mut statuses = team.statuses.clone();
        statuses.push(status);
        StatusValidator::validate_registry(&statuses)?;
        team.statuses = statuses;
        Ok(())
    }

    /// Add a task to a team.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the task is invalid or its id is taken.
    pub fn insert_task(&self, team_id: &str, task: Task) -> Result<()> {
        let mut teams = self.teams();
        let team = teams.entry(team_id.to_string()).or_default();
        TaskValidator::validate(&task).map_err(KanbanError::from_validation_errors)?;
        if team.tasks.iter().any(|t| t.id == task.id) {
            return Err(KanbanError::validation(
                "id",
                format!("duplicate task id {}", task.id),
            ));
        }
        team.tasks.push(task);
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[must_use]
    pub fn tasks(&self, team_id: &str) -> Vec<Task> {
        self.teams()
            .get(team_id)
            .map(|t| t.tasks.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn statuses(&self, team_id: &str) -> Vec<Status> {
        self.teams()
            .get(team_id)
            .map(|t| t.statuses.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn or_empty<T>(loaded: Result<Vec<T>>) -> Result<Vec<T>> {
    match loaded {
        Err(KanbanError::FileNotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

#[async_trait]
impl TaskSource for MemoryStore {
    async fn list_tasks(&self, team_id: &str) -> Result<Vec<Task>> {
        Ok(self.tasks(team_id))
    }

    async fn update_task(&self, task: &Task, id: &str) -> Result<MutationOutcome> {
        let mut teams = self.teams();
        let existing = teams
            .values_mut()
            .flat_map(|team| team.tasks.iter_mut())
            .find(|t| t.id == id);
        let Some(existing) = existing else {
            return Ok(MutationOutcome::default());
        };

        let mut updated = task.clone();
        updated.id = id.to_string();
        *existing = updated;
        Ok(MutationOutcome::affected(1))
    }
}

#[async_trait]
impl StatusSource for MemoryStore {
    async fn list_statuses(&self, team_id: &str) -> Result<Vec<Status>> {
        Ok(self.statuses(team_id))
    }

    async fn update_status(&self, id: &str, patch: &StatusPatch) -> Result<MutationOutcome> {
        let mut teams = self.teams();
        let existing = teams
            .values_mut()
            .flat_map(|team| team.statuses.iter_mut())
            .find(|s| s.id == id);
        let Some(existing) = existing else {
            return Ok(MutationOutcome::default());
        };

        patch.apply_to(existing);
        Ok(MutationOutcome::affected(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_status(id: &str, name: &str, order: i32) -> Status {
        Status {
            id: id.to_string(),
            name: name.to_string(),
            order,
            ..Default::default()
        }
    }

    fn make_task(id: &str, status_id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            task_status_id: Some(status_id.to_string()),
            ..Default::default()
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_status("team", make_status("s1", "Todo", 0))
            .unwrap();
        store
            .insert_status("team", make_status("s2", "Done", 1))
            .unwrap();
        store.insert_task("team", make_task("t1", "s1")).unwrap();
        store
    }

    #[test]
    fn test_insert_rejects_duplicate_column_name() {
        let store = seeded();
        let result = store.insert_status("team", make_status("s3", "Todo", 2));
        assert!(matches!(
            result,
            Err(KanbanError::DuplicateColumnName { .. })
        ));
        assert_eq!(store.statuses("team").len(), 2);
    }

    #[test]
    fn test_insert_rejects_duplicate_task() {
        let store = seeded();
        assert!(store.insert_task("team", make_task("t1", "s2")).is_err());
    }

    #[test]
    fn test_teams_are_separate() {
        let store = seeded();
        assert!(store.tasks("other").is_empty());
        assert!(store.statuses("other").is_empty());
    }

    #[tokio::test]
    async fn test_update_task_replaces_record() {
        let store = seeded();
        let mut moved = make_task("t1", "s2");
        moved.status = "Done".to_string();

        let outcome = store.update_task(&moved, "t1").await.unwrap();
        assert!(outcome.is_applied());
        assert_eq!(store.tasks("team")[0].status, "Done");
    }

    #[tokio::test]
    async fn test_update_unknown_ids_affect_nothing() {
        let store = seeded();
        let outcome = store
            .update_task(&make_task("nope", "s1"), "nope")
            .await
            .unwrap();
        assert_eq!(outcome.affected, 0);

        let outcome = store
            .update_status("nope", &StatusPatch::collapsed(true))
            .await
            .unwrap();
        assert!(!outcome.is_applied());
    }

    #[tokio::test]
    async fn test_update_status_applies_patch() {
        let store = seeded();
        store
            .update_status("s2", &StatusPatch::order(-1))
            .await
            .unwrap();
        let statuses = store.list_statuses("team").await.unwrap();
        assert_eq!(statuses[1].order, -1);
        assert!(!statuses[1].is_collapsed);
    }

    #[test]
    fn test_roundtrip_save_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded();
        store.save_to(dir.path()).unwrap();

        let loaded = MemoryStore::open(dir.path(), "team").unwrap();
        assert_eq!(loaded.statuses("team"), store.statuses("team"));
        assert_eq!(loaded.tasks("team"), store.tasks("team"));
        assert_eq!(loaded.data_dir(), Some(dir.path()));
    }

    #[test]
    fn test_open_missing_team_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(dir.path(), "fresh").unwrap();
        assert!(store.tasks("fresh").is_empty());
        assert!(store.statuses("fresh").is_empty());
    }

    #[test]
    fn test_open_rejects_duplicate_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let team_dir = dir.path().join("team");
        jsonl::save_statuses(
            &team_dir.join(STATUSES_FILE),
            &[make_status("s1", "Todo", 0), make_status("s2", "Todo", 1)],
        )
        .unwrap();

        let result = MemoryStore::open(dir.path(), "team");
        assert!(matches!(
            result,
            Err(KanbanError::DuplicateColumnName { .. })
        ));
    }

    #[test]
    fn test_save_without_dir_fails() {
        assert!(matches!(
            MemoryStore::new().save(),
            Err(KanbanError::Config(_))
        ));
    }
}
