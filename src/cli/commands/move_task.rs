//! `kb move`: drag a task to a column position.

use anyhow::{Result, bail};
use kanban_core::{DropLocation, DropOutcome, KanbanError};
use tracing::info;

use super::print_json;
use crate::cli::{CommandContext, MoveArgs};
use crate::format::MoveOutput;

/// Execute the move command.
///
/// The task is picked up from wherever it sits on the unfiltered board and
/// dropped at `--index` in the destination column.
///
/// # Errors
///
/// Returns an error if the task or column is unknown, the store rejects the
/// move, or the snapshot cannot be saved.
pub async fn execute(args: &MoveArgs, ctx: &CommandContext) -> Result<()> {
    let (store, engine) = ctx.open_engine().await?;

    let source = {
        let board = engine.board();
        let (column, index) =
            board
                .locate(&args.task)
                .ok_or_else(|| KanbanError::TaskNotFound {
                    id: args.task.clone(),
                })?;
        DropLocation::new(column, index)
    };
    let destination = DropLocation::new(args.column.clone(), args.index);
    let from = source.column.clone();

    engine.start_drag(source.clone())?;
    let outcome = engine.on_drop(source, destination).await?;
    if outcome == DropOutcome::RolledBack {
        bail!("Move of {} was rejected by the store", args.task);
    }
    if outcome == DropOutcome::Moved {
        store.save()?;
        info!(task = %args.task, from = %from, to = %args.column, "task moved");
    }

    if ctx.json {
        return print_json(&MoveOutput {
            task_id: args.task.clone(),
            from,
            to: args.column.clone(),
            index: args.index,
            outcome: MoveOutput::outcome_label(outcome).to_string(),
        });
    }
    match outcome {
        DropOutcome::NoOp => println!("{} is already at {} #{}", args.task, args.column, args.index),
        _ => println!("Moved {} from {from} to {} #{}", args.task, args.column, args.index),
    }
    Ok(())
}
