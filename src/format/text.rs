//! Text formatting functions for `kb`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Column headers (▾ expanded, ▸ collapsed) with counts and estimates
//! - Priority and size badges
//! - Task line formatting with width-aware title truncation

use std::fmt::Write as _;

use kanban_core::{Board, BoardColumn, Priority, Task, TaskSize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Column header markers.
pub mod icons {
    /// Expanded column.
    pub const EXPANDED: &str = "▾";
    /// Collapsed column; tasks are hidden.
    pub const COLLAPSED: &str = "▸";
    /// Truncated title.
    pub const ELLIPSIS: &str = "…";
}

/// Widest title shown on a task line.
pub const MAX_TITLE_WIDTH: usize = 60;

/// Priority as a bracketed badge, `[-]` when unset.
#[must_use]
pub fn format_priority(priority: Option<&Priority>) -> String {
    priority.map_or_else(|| "[-]".to_string(), |p| format!("[{}]", p.as_str()))
}

/// Size as a short badge, empty when unset.
#[must_use]
pub fn format_size(size: Option<&TaskSize>) -> String {
    size.map_or_else(String::new, |s| format!(" ({})", s.as_str()))
}

/// Seconds as `2h 05m`, `45m` or `30s`.
#[must_use]
pub fn format_estimate(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m:02}m"),
    }
}

/// Cut `title` to at most `max_width` display columns, marking the cut.
#[must_use]
pub fn truncate_title(title: &str, max_width: usize) -> String {
    if title.width() <= max_width {
        return title.to_string();
    }
    let budget = max_width.saturating_sub(icons::ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for ch in title.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(icons::ELLIPSIS);
    out
}

/// Format a single-line task summary.
///
/// Format: `{id} [{priority}] {title}{ (size)}{ #label…}{ @member…}`
#[must_use]
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!(
        "{} {} {}{}",
        task.id,
        format_priority(task.priority.as_ref()),
        truncate_title(&task.title, MAX_TITLE_WIDTH),
        format_size(task.size.as_ref()),
    );
    for tag in &task.tags {
        let _ = write!(line, " #{}", tag.name);
    }
    for member in &task.members {
        let _ = write!(line, " @{}", member.full_name);
    }
    line
}

/// Column header: marker, name, task count and summed estimate.
#[must_use]
pub fn format_column_header(column: &BoardColumn) -> String {
    let marker = if column.status.is_collapsed {
        icons::COLLAPSED
    } else {
        icons::EXPANDED
    };
    let mut header = format!("{marker} {} ({})", column.name(), column.tasks.len());
    let estimate: u64 = column.tasks.iter().filter_map(|t| t.estimate).sum();
    if estimate > 0 {
        let _ = write!(header, " · {}", format_estimate(estimate));
    }
    header
}

/// Render the whole board, one block per column. Collapsed columns show
/// only their header.
#[must_use]
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for (index, column) in board.columns().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format_column_header(column));
        out.push('\n');
        if column.status.is_collapsed {
            continue;
        }
        for (position, task) in column.tasks.iter().enumerate() {
            let _ = writeln!(out, "  {position:>2}. {}", format_task_line(task));
        }
    }
    out
}
