//! Remote collaborators the engine reads from and mutates through.
//!
//! Implementations wrap whatever transport the host application uses; the
//! engine only sees these traits. Real implementation: an HTTP client in the
//! host app. In-process implementation: [`crate::memory::MemoryStore`].

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{MutationOutcome, Status, StatusPatch, Task};

/// Task collection for a team.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn list_tasks(&self, team_id: &str) -> Result<Vec<Task>>;

    /// Persist `task` under `id`. `affected == 0` means nothing changed.
    async fn update_task(&self, task: &Task, id: &str) -> Result<MutationOutcome>;
}

/// Status registry for a team.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn list_statuses(&self, team_id: &str) -> Result<Vec<Status>>;

    async fn update_status(&self, id: &str, patch: &StatusPatch) -> Result<MutationOutcome>;
}
