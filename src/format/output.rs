use kanban_core::{Board, DropOutcome, Resolution, Status, Task};
use serde::{Deserialize, Serialize};

/// One column of `kb board --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOutput {
    pub id: String,
    pub name: String,
    pub order: i32,
    pub is_collapsed: bool,
    pub task_count: usize,
    pub total_estimate: u64,
    pub tasks: Vec<Task>,
}

/// `kb board --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOutput {
    pub team: String,
    pub columns: Vec<ColumnOutput>,
}

impl BoardOutput {
    #[must_use]
    pub fn new(team: &str, board: &Board) -> Self {
        let columns = board
            .columns()
            .iter()
            .zip(board.summaries())
            .map(|(column, summary)| ColumnOutput {
                id: column.status.id.clone(),
                name: summary.name,
                order: column.status.order,
                is_collapsed: summary.is_collapsed,
                task_count: summary.task_count,
                total_estimate: summary.total_estimate,
                tasks: column.tasks.clone(),
            })
            .collect();
        Self {
            team: team.to_string(),
            columns,
        }
    }
}

/// `kb move --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutput {
    pub task_id: String,
    pub from: String,
    pub to: String,
    pub index: usize,
    pub outcome: String,
}

impl MoveOutput {
    #[must_use]
    pub fn outcome_label(outcome: DropOutcome) -> &'static str {
        match outcome {
            DropOutcome::NoOp => "unchanged",
            DropOutcome::Moved => "moved",
            DropOutcome::RolledBack => "rolled_back",
        }
    }
}

/// `kb collapse|expand|reorder --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnUpdateOutput {
    pub column: String,
    pub resolution: String,
    pub is_collapsed: bool,
    pub order: i32,
}

impl ColumnUpdateOutput {
    #[must_use]
    pub fn new(status: &Status, resolution: Option<Resolution>) -> Self {
        Self {
            column: status.name.clone(),
            resolution: resolution_label(resolution).to_string(),
            is_collapsed: status.is_collapsed,
            order: status.order,
        }
    }
}

/// Human label for a column mutation result; `None` means nothing was sent.
#[must_use]
pub const fn resolution_label(resolution: Option<Resolution>) -> &'static str {
    match resolution {
        None => "unchanged",
        Some(Resolution::Committed) => "committed",
        Some(Resolution::RolledBack) => "rolled_back",
        Some(Resolution::Superseded) => "superseded",
    }
}
