//! Command-line interface for `kb`.
//!
//! This module provides the CLI parsing and command routing using clap.
//! Every command opens the team's JSONL snapshot through a
//! [`MemoryStore`], drives a [`KanbanEngine`] over it, and saves back when
//! something changed.

pub mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kanban_core::{IssueType, KanbanEngine, MemoryStore, Priority, TaskSize};
use tracing::debug;

use crate::config::{self, CliOverrides, KanbanConfig};
use crate::logging;

/// `kb` - Kanban board sync engine.
#[derive(Parser, Debug)]
#[command(name = "kb")]
#[command(
    author,
    version,
    about = "Kanban board with optimistic column and drag mutations",
    long_about = None,
    after_help = "Boards live as JSONL under the data directory, one folder per team."
)]
pub struct Cli {
    /// Team whose board to use
    #[arg(long, global = true)]
    pub team: Option<String>,

    /// Directory holding team snapshots
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append JSON log lines to this file
    #[arg(long, global = true, env = "KANBAN_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a workspace with default columns
    Init(InitArgs),

    /// Show the board
    Board(BoardArgs),

    /// Create a task at the top of a column
    Add(AddArgs),

    /// Drag a task to a column
    Move(MoveArgs),

    /// Collapse a column
    Collapse(ColumnArgs),

    /// Expand a column
    Expand(ColumnArgs),

    /// Change a column's position
    Reorder(ReorderArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config and column set
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct BoardArgs {
    /// Case-insensitive title search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Keep tasks with any of these priorities
    #[arg(long = "priority", short = 'p')]
    pub priorities: Vec<Priority>,

    /// Keep tasks with any of these sizes
    #[arg(long = "size")]
    pub sizes: Vec<TaskSize>,

    /// Keep tasks carrying any of these labels
    #[arg(long = "label", short = 'l')]
    pub labels: Vec<String>,

    /// Keep only these task ids (epic filter)
    #[arg(long = "epic")]
    pub epics: Vec<String>,

    /// Keep tasks of this type
    #[arg(long = "issue-type", short = 't')]
    pub issue_type: Option<IssueType>,

    /// Keep tasks assigned to this member
    #[arg(long)]
    pub employee: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Column to add to (defaults to the leftmost)
    #[arg(long, short = 'c')]
    pub column: Option<String>,

    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub size: Option<TaskSize>,

    #[arg(long = "issue-type", short = 't')]
    pub issue_type: Option<IssueType>,

    /// Estimate in minutes
    #[arg(long)]
    pub estimate: Option<u64>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Task id
    pub task: String,

    /// Destination column name
    pub column: String,

    /// Position in the destination column
    #[arg(long, short = 'i', default_value_t = 0)]
    pub index: usize,
}

#[derive(Args, Debug)]
pub struct ColumnArgs {
    /// Column name
    pub column: String,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Column name
    pub column: String,

    /// New order value, or position with --index
    #[arg(allow_negative_numbers = true)]
    pub order: i32,

    /// Treat the value as a position among the columns
    #[arg(long)]
    pub index: bool,
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: KanbanConfig,
    pub root: PathBuf,
    pub json: bool,
}

impl CommandContext {
    /// Open the team snapshot and load an engine over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or is invalid.
    pub async fn open_engine(&self) -> Result<(Arc<MemoryStore>, KanbanEngine)> {
        let store = Arc::new(
            MemoryStore::open(&self.config.data_dir, &self.config.team).with_context(|| {
                format!("Failed to load board from {}", self.config.team_dir().display())
            })?,
        );
        let engine = KanbanEngine::new(&self.config.team, store.clone(), store.clone());
        engine.refresh().await?;
        Ok((store, engine))
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let root = std::env::current_dir().context("Failed to read current directory")?;
    let overrides = CliOverrides {
        team: cli.team.clone(),
        data_dir: cli.data_dir.clone(),
    };
    let config = config::load_config(&root, &overrides)?;
    debug!(team = %config.team, data_dir = %config.data_dir.display(), "config resolved");

    let ctx = CommandContext {
        config,
        root,
        json: cli.json,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(dispatch(cli.command, &ctx))
}

async fn dispatch(command: Option<Commands>, ctx: &CommandContext) -> Result<()> {
    match command {
        Some(Commands::Init(args)) => commands::init::execute(&args, ctx),
        Some(Commands::Board(args)) => commands::board::execute(&args, ctx).await,
        Some(Commands::Add(args)) => commands::add::execute(args, ctx).await,
        Some(Commands::Move(args)) => commands::move_task::execute(&args, ctx).await,
        Some(Commands::Collapse(args)) => commands::column::collapse(&args, true, ctx).await,
        Some(Commands::Expand(args)) => commands::column::collapse(&args, false, ctx).await,
        Some(Commands::Reorder(args)) => commands::column::reorder(&args, ctx).await,
        Some(Commands::Version) => commands::version::execute(ctx),
        None => commands::board::execute(&BoardArgs::default(), ctx).await,
    }
}
