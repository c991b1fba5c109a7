//! `kb init`: write the workspace config and seed a default column set.

use std::fs;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use kanban_core::{MemoryStore, Status, jsonl};
use serde::Serialize;
use tracing::info;

use super::print_json;
use crate::cli::{CommandContext, InitArgs};
use crate::config::{self, ConfigFile};
use crate::util::id::hash_base36;

/// Columns created by a fresh `kb init`, left to right.
pub const DEFAULT_COLUMNS: [&str; 3] = ["Todo", "In Progress", "Done"];

const STATUSES_FILE: &str = "statuses.jsonl";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitOutput<'a> {
    team: &'a str,
    config_path: String,
    columns: Vec<&'a str>,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the team already has columns and `--force` was not
/// given, or if any file cannot be written.
pub fn execute(args: &InitArgs, ctx: &CommandContext) -> Result<()> {
    let team = &ctx.config.team;
    let team_dir = ctx.config.team_dir();
    let statuses_path = team_dir.join(STATUSES_FILE);

    if statuses_path.exists() && !args.force {
        bail!(
            "Team '{team}' already has columns at {} (use --force to reset them)",
            statuses_path.display()
        );
    }

    let config_path = config::config_path(&ctx.root);
    if !config_path.exists() || args.force {
        let file = ConfigFile {
            team: Some(team.clone()),
            data_dir: None,
        };
        file.save(&config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    fs::create_dir_all(&team_dir)
        .with_context(|| format!("Failed to create {}", team_dir.display()))?;

    let statuses = default_statuses(team);
    let store = MemoryStore::new();
    for status in &statuses {
        store.insert_status(team, status.clone())?;
    }
    jsonl::save_statuses(&statuses_path, &store.statuses(team))?;
    info!(team = %team, columns = statuses.len(), "workspace initialized");

    if ctx.json {
        return print_json(&InitOutput {
            team,
            config_path: config_path.display().to_string(),
            columns: DEFAULT_COLUMNS.to_vec(),
        });
    }
    println!(
        "Initialized board for team '{team}' in {}",
        team_dir.display()
    );
    Ok(())
}

/// Default column set with ids derived from the team and creation time.
#[must_use]
pub fn default_statuses(team: &str) -> Vec<Status> {
    let seed = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    DEFAULT_COLUMNS
        .iter()
        .zip(0..)
        .map(|(name, order)| Status {
            id: format!("st-{}", hash_base36(&format!("{team}|{name}|{seed}"), 6)),
            name: (*name).to_string(),
            order,
            ..Default::default()
        })
        .collect()
}
