//! `kb board`: project the filtered board.

use anyhow::Result;
use kanban_core::{Board, TaskFilters};

use super::print_json;
use crate::cli::{BoardArgs, CommandContext};
use crate::format::{BoardOutput, render_board};

/// Execute the board command.
///
/// # Errors
///
/// Returns an error if the team snapshot cannot be loaded.
pub async fn execute(args: &BoardArgs, ctx: &CommandContext) -> Result<()> {
    let (_store, engine) = ctx.open_engine().await?;
    engine.set_filters(build_filters(args));
    let board = engine.board();
    print_board(ctx, &board)
}

/// Print the board in the mode selected by `--json`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_board(ctx: &CommandContext, board: &Board) -> Result<()> {
    if ctx.json {
        return print_json(&BoardOutput::new(&ctx.config.team, board));
    }
    if board.columns().is_empty() {
        println!("No columns. Run `kb init` to create the default set.");
        return Ok(());
    }
    print!("{}", render_board(board));
    Ok(())
}

/// Translate command-line filter flags into engine filters.
#[must_use]
pub fn build_filters(args: &BoardArgs) -> TaskFilters {
    TaskFilters {
        search_text: args.search.clone().unwrap_or_default(),
        priorities: args.priorities.iter().cloned().collect(),
        sizes: args.sizes.iter().cloned().collect(),
        labels: args.labels.iter().cloned().collect(),
        epic_ids: args.epics.iter().cloned().collect(),
        issue_type: args.issue_type.clone(),
        employee_name: args.employee.clone(),
    }
}
