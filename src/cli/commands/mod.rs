//! Command implementations for `kb`.

pub mod add;
pub mod board;
pub mod column;
pub mod init;
pub mod move_task;
pub mod version;

use anyhow::Result;
use serde::Serialize;

/// Print a value as one pretty JSON document on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
