//! `kanban-core`: kanban board projection and optimistic sync engine.
//!
//! Filters a team's tasks, groups them into ordered status columns, and
//! applies column and task mutations optimistically against injected
//! remote sources. The bundled [`MemoryStore`] stands in for a server and
//! persists to JSONL files.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kanban_core::{DropLocation, KanbanEngine, MemoryStore};
//!
//! # async fn demo() -> kanban_core::Result<()> {
//! let store = Arc::new(MemoryStore::open(".kanban", "default")?);
//! let engine = KanbanEngine::new("default", store.clone(), store.clone());
//! engine.refresh().await?;
//!
//! // Filter
//! engine.set_search_text("login");
//!
//! // Collapse a column
//! engine.toggle_column("Done", true).await?;
//!
//! // Drag the top task of "Todo" to the top of "Done"
//! engine
//!     .on_drop(DropLocation::new("Todo", 0), DropLocation::new("Done", 0))
//!     .await?;
//!
//! for column in engine.board().columns() {
//!     println!("{}: {}", column.name(), column.tasks.len());
//! }
//!
//! // Save back
//! store.save()?;
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod drag;
pub mod engine;
pub mod error;
pub mod filter;
pub mod jsonl;
pub mod memory;
pub mod model;
pub mod overlay;
pub mod source;
pub mod validation;

pub use board::{Board, BoardColumn, ColumnSummary};
pub use drag::{DragPhase, DropLocation};
pub use engine::{BoardView, DropOutcome, KanbanEngine};
pub use error::{KanbanError, Result};
pub use filter::{TaskFilters, filter_tasks};
pub use memory::MemoryStore;
pub use model::{
    Employee, IssueType, Label, MutationOutcome, Priority, Status, StatusPatch, Task, TaskSize,
};
pub use overlay::Resolution;
pub use source::{StatusSource, TaskSource};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
