//! `kb add`: create a task at the top of a column.

use anyhow::{Context, Result};
use chrono::Utc;
use kanban_core::Task;
use serde::Serialize;
use tracing::info;

use super::print_json;
use crate::cli::{AddArgs, CommandContext};
use crate::util::{DEFAULT_PREFIX, TaskIdGenerator};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddOutput<'a> {
    id: &'a str,
    title: &'a str,
    column: &'a str,
}

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the title is blank, the column does not exist, or the
/// snapshot cannot be saved.
pub async fn execute(args: AddArgs, ctx: &CommandContext) -> Result<()> {
    let title = args.title.trim().to_string();
    if title.is_empty() {
        anyhow::bail!("Task title cannot be empty");
    }

    let (store, engine) = ctx.open_engine().await?;
    let column = match args.column {
        Some(name) => engine
            .column_by_name(&name)
            .with_context(|| format!("Column not found: {name}"))?,
        None => engine
            .columns()
            .into_iter()
            .next()
            .context("Board has no columns; run `kb init` first")?,
    };

    let team = &ctx.config.team;
    let existing = store.tasks(team);
    let id = TaskIdGenerator::new(DEFAULT_PREFIX, team.as_str()).generate(
        &title,
        Utc::now(),
        existing.len(),
        |candidate| existing.iter().any(|t| t.id == candidate),
    );

    let mut task = Task {
        id,
        title,
        priority: args.priority,
        size: args.size,
        issue_type: args.issue_type,
        estimate: args.estimate.map(|minutes| minutes.saturating_mul(60)),
        ..Default::default()
    };
    task.assign_status(&column);

    store.insert_task(team, task.clone())?;
    engine.add_task(task.clone(), &column.name)?;
    store.save()?;
    info!(id = %task.id, column = %column.name, "task created");

    if ctx.json {
        return print_json(&AddOutput {
            id: &task.id,
            title: &task.title,
            column: &column.name,
        });
    }
    println!("Created {} in {}", task.id, column.name);
    Ok(())
}
