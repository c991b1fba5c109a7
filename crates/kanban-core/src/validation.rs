//! Boundary validation for data arriving from task and status sources.
//!
//! The engine trusts its inputs; sources call these before handing data
//! over. A duplicate column name is a configuration error because the
//! board is keyed by name.

use std::collections::HashSet;

use crate::error::{KanbanError, Result, ValidationError};
use crate::model::{Status, Task};

/// Validates column registries.
pub struct StatusValidator;

impl StatusValidator {
    /// Validate one status and return all field errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any rule is violated.
    pub fn validate(status: &Status) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if status.id.trim().is_empty() {
            errors.push(ValidationError::new("id", "cannot be empty"));
        }
        if status.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "cannot be empty"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a whole registry: every status, plus unique ids and names.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateColumnName` for a repeated name, otherwise a
    /// validation error for the first invalid status or repeated id.
    pub fn validate_registry(statuses: &[Status]) -> Result<()> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();

        for status in statuses {
            Self::validate(status).map_err(KanbanError::from_validation_errors)?;
            if !names.insert(status.name.as_str()) {
                return Err(KanbanError::DuplicateColumnName {
                    name: status.name.clone(),
                });
            }
            if !ids.insert(status.id.as_str()) {
                return Err(KanbanError::validation(
                    "id",
                    format!("duplicate status id {}", status.id),
                ));
            }
        }

        Ok(())
    }
}

/// Validates task records.
pub struct TaskValidator;

impl TaskValidator {
    /// Validate one task and return all field errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any rule is violated.
    pub fn validate(task: &Task) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if task.id.trim().is_empty() {
            errors.push(ValidationError::new("id", "cannot be empty"));
        }
        if task.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if task
            .task_status_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            errors.push(ValidationError::new(
                "taskStatusId",
                "cannot be blank when present",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a task collection: every task, plus unique ids.
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first invalid or repeated task.
    pub fn validate_collection(tasks: &[Task]) -> Result<()> {
        let mut ids = HashSet::new();
        for task in tasks {
            Self::validate(task).map_err(KanbanError::from_validation_errors)?;
            if !ids.insert(task.id.as_str()) {
                return Err(KanbanError::validation(
                    "id",
                    format!("duplicate task id {}", task.id),
                ));
            }
        }
        Ok(())
    }
}
