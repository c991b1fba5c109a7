//! Version command implementation.

use anyhow::Result;
use serde::Serialize;

use super::print_json;
use crate::cli::CommandContext;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    core: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) {
            "dev"
        } else {
            "release"
        },
        core: kanban_core::VERSION,
    };
    if ctx.json {
        return print_json(&output);
    }
    println!("kb {} ({}, core {})", output.version, output.build, output.core);
    Ok(())
}
