//! `kb` - Kanban board with optimistic column and drag mutations.
//!
//! Boards are stored as JSONL, one directory per team. Every mutation shows
//! locally first and is rolled back if the store rejects it.

use kanban_sync::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
