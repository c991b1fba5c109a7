//! Error types for `kanban-core`.
//!
//! Remote mutation failures never reach callers of the engine's gesture
//! operations; they are rolled back and logged. The variants below cover
//! the boundary (loading, validation, lookups, snapshot files).

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for kanban-core operations.
#[derive(Error, Debug)]
pub enum KanbanError {
    // === Lookup Errors ===
    /// Task with the specified ID was not found.
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    /// Status with the specified ID was not found in the registry.
    #[error("Status not found: {id}")]
    StatusNotFound { id: String },

    /// No column carries the given name.
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    /// A drop referenced a position outside the column.
    #[error("No task at {column}[{index}]")]
    NoTaskAtPosition { column: String, index: usize },

    /// A drag gesture was started while another one is still active.
    #[error("Drag already in progress for task {task_id}")]
    DragInProgress { task_id: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Two columns share a name; the board is keyed by name.
    #[error("Duplicate column name: {name}")]
    DuplicateColumnName { name: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    // === Remote Errors ===
    /// A task or status source request failed.
    #[error("Remote request failed: {0}")]
    Remote(String),

    // === JSONL Errors ===
    /// Failed to parse a line in a JSONL snapshot.
    #[error("JSONL parse error at line {line}: {reason}")]
    JsonlParse { line: usize, reason: String },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl KanbanError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn remote(reason: impl std::fmt::Display) -> Self {
        Self::Remote(reason.to_string())
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `KanbanError`.
pub type Result<T> = std::result::Result<T, KanbanError>;
