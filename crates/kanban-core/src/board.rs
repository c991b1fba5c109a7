//! Board projection: filtered tasks bucketed into ordered status columns.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Status, Task};

/// One column of the board with its tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: Status,
    pub tasks: Vec<Task>,
}

impl BoardColumn {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.status.name
    }
}

/// Column name to ordered task list, in left-to-right column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    columns: Vec<BoardColumn>,
}

/// Aggregate figures for a column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub name: String,
    pub task_count: usize,
    pub total_estimate: u64,
    pub is_collapsed: bool,
}

impl Board {
    /// Bucket `tasks` into `columns`.
    ///
    /// `columns` must already be in display order. Tasks keep their relative
    /// order within a column. Tasks whose `task_status_id` is missing or names
    /// no column are left off the board.
    #[must_use]
    pub fn project(columns: &[Status], tasks: &[&Task]) -> Self {
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(columns.len());
        for (index, status) in columns.iter().enumerate() {
            by_id.entry(status.id.as_str()).or_insert(index);
        }

        let mut board_columns: Vec<BoardColumn> = columns
            .iter()
            .map(|status| BoardColumn {
                status: status.clone(),
                tasks: Vec::new(),
            })
            .collect();

        let mut dropped = 0usize;
        for task in tasks {
            match task
                .task_status_id
                .as_deref()
                .and_then(|id| by_id.get(id))
            {
                Some(&index) => board_columns[index].tasks.push((*task).clone()),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "tasks without a known column left off the board");
        }

        Self {
            columns: board_columns,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    /// Tasks of the column with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Task]> {
        self.column(name).map(|c| c.tasks.as_slice())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.status.name == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut BoardColumn> {
        self.columns.iter_mut().find(|c| c.status.name == name)
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [BoardColumn] {
        &mut self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(BoardColumn::name)
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Column name and index of a task, if it is on the board.
    #[must_use]
    pub fn locate(&self, task_id: &str) -> Option<(&str, usize)> {
        self.columns.iter().find_map(|column| {
            column
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|index| (column.name(), index))
        })
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .map(|column| ColumnSummary {
                name: column.status.name.clone(),
                task_count: column.tasks.len(),
                total_estimate: column.tasks.iter().filter_map(|t| t.estimate).sum(),
                is_collapsed: column.status.is_collapsed,
            })
            .collect()
    }
}
