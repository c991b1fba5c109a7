//! Drag-and-drop gesture tracking and local task splices.
//!
//! A drop is shown immediately by replaying [`LocalMove`]s over the freshly
//! projected board. Moves live until the next authoritative task refresh,
//! or until their own remote update fails.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{KanbanError, Result};
use crate::model::Status;

/// A position on the board: column name and index within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropLocation {
    pub column: String,
    pub index: usize,
}

impl DropLocation {
    #[must_use]
    pub fn new(column: impl Into<String>, index: usize) -> Self {
        Self {
            column: column.into(),
            index,
        }
    }
}

/// Phase of the active drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Purely visual; nothing has changed yet.
    Dragging { task_id: String, source: DropLocation },
    /// Dropped; the task update is in flight.
    Reconciling { task_id: String },
}

impl DragPhase {
    fn task_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { task_id, .. } | Self::Reconciling { task_id } => {
                Some(task_id.as_str())
            }
        }
    }

    /// Enter `Dragging`. Only valid from `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `DragInProgress` if another gesture is active.
    pub fn begin(&mut self, task_id: &str, source: DropLocation) -> Result<()> {
        if let Some(active) = self.task_id() {
            return Err(KanbanError::DragInProgress {
                task_id: active.to_string(),
            });
        }
        *self = Self::Dragging {
            task_id: task_id.to_string(),
            source,
        };
        Ok(())
    }

    /// Enter `Reconciling` for a drop. A drop without a prior `begin` is
    /// accepted from `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `DragInProgress` if a different task is being dragged or any
    /// drop is still reconciling.
    pub fn drop_task(&mut self, task_id: &str) -> Result<()> {
        match &*self {
            Self::Idle => {}
            Self::Dragging { task_id: active, .. } if active == task_id => {}
            Self::Dragging { task_id: active, .. } | Self::Reconciling { task_id: active } => {
                return Err(KanbanError::DragInProgress {
                    task_id: active.clone(),
                });
            }
        }
        *self = Self::Reconciling {
            task_id: task_id.to_string(),
        };
        Ok(())
    }

    /// Abandon a visual drag or finish reconciliation.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

/// An optimistic task move replayed over each projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMove {
    pub task_id: String,
    pub destination: Status,
    pub index: usize,
    pub generation: u64,
}

/// Splice each move into the board in order.
///
/// Moves whose task is not on the board (filtered out or gone) or whose
/// destination column is missing are skipped. Indices past the end append.
pub fn apply_moves(board: &mut Board, moves: &[LocalMove]) {
    for mv in moves {
        let has_destination = board
            .columns()
            .iter()
            .any(|c| c.status.id == mv.destination.id);
        if !has_destination {
            continue;
        }

        let Some((from_column, from_index)) = board
            .locate(&mv.task_id)
            .map(|(name, index)| (name.to_string(), index))
        else {
            continue;
        };

        let Some(mut task) = board
            .column_mut(&from_column)
            .map(|c| c.tasks.remove(from_index))
        else {
            continue;
        };
        task.assign_status(&mv.destination);

        if let Some(column) = board
            .columns_mut()
            .iter_mut()
            .find(|c| c.status.id == mv.destination.id)
        {
            let index = mv.index.min(column.tasks.len());
            column.tasks.insert(index, task);
        }
    }
}
