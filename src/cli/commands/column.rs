//! `kb collapse`, `kb expand` and `kb reorder`: optimistic column updates.

use anyhow::{Context, Result, bail};
use kanban_core::{KanbanEngine, MemoryStore, Resolution};
use tracing::info;

use super::print_json;
use crate::cli::{ColumnArgs, CommandContext, ReorderArgs};
use crate::format::{ColumnUpdateOutput, resolution_label};

/// Collapse (`collapsed = true`) or expand a column.
///
/// # Errors
///
/// Returns an error if the column is unknown or the store rejects the update.
pub async fn collapse(args: &ColumnArgs, collapsed: bool, ctx: &CommandContext) -> Result<()> {
    let (store, engine) = ctx.open_engine().await?;
    let current = engine
        .column_by_name(&args.column)
        .with_context(|| format!("Column not found: {}", args.column))?;

    let resolution = if current.is_collapsed == collapsed {
        None
    } else {
        Some(engine.toggle_column(&args.column, collapsed).await?)
    };
    finish(&store, &engine, &args.column, resolution, ctx)
}

/// Set a column's order value, or move it to a position with `--index`.
///
/// # Errors
///
/// Returns an error if the column is unknown, the position is negative, or
/// the store rejects the update.
pub async fn reorder(args: &ReorderArgs, ctx: &CommandContext) -> Result<()> {
    let (store, engine) = ctx.open_engine().await?;
    let current = engine
        .column_by_name(&args.column)
        .with_context(|| format!("Column not found: {}", args.column))?;

    let resolution = if args.index {
        let Ok(index) = usize::try_from(args.order) else {
            bail!("Column position cannot be negative: {}", args.order);
        };
        engine.on_column_drop(&args.column, index).await?
    } else if current.order == args.order {
        None
    } else {
        Some(engine.set_column_order(&current.id, args.order).await)
    };
    finish(&store, &engine, &args.column, resolution, ctx)
}

fn finish(
    store: &MemoryStore,
    engine: &KanbanEngine,
    name: &str,
    resolution: Option<Resolution>,
    ctx: &CommandContext,
) -> Result<()> {
    match resolution {
        Some(Resolution::RolledBack) => bail!("Update of column {name} was rejected by the store"),
        Some(Resolution::Committed) => {
            store.save()?;
            info!(column = %name, "column updated");
        }
        _ => {}
    }

    let status = engine
        .column_by_name(name)
        .with_context(|| format!("Column not found: {name}"))?;
    if ctx.json {
        return print_json(&ColumnUpdateOutput::new(&status, resolution));
    }
    let state = if status.is_collapsed {
        "collapsed"
    } else {
        "expanded"
    };
    println!(
        "{name}: {state}, order {} ({})",
        status.order,
        resolution_label(resolution)
    );
    Ok(())
}
