//! Output formatting for `kb`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! With `--json`, stdout carries exactly one JSON document; diagnostics go
//! to stderr.
//!
//! # JSON Output Types
//!
//! - [`BoardOutput`] - Columns with summaries and tasks (board)
//! - [`MoveOutput`] - Result of a task drag (move)
//! - [`ColumnUpdateOutput`] - Column state after collapse/expand/reorder

mod output;
mod text;

pub use output::{BoardOutput, ColumnOutput, ColumnUpdateOutput, MoveOutput, resolution_label};
pub use text::{
    format_column_header, format_estimate, format_priority, format_size, format_task_line,
    render_board, truncate_title,
};
