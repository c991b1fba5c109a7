//! `kanban_sync` - Kanban board CLI over the `kanban-core` sync engine
//!
//! This crate provides the `kb` binary: a thin command layer that opens a
//! team's JSONL snapshot, drives the optimistic engine, and prints the
//! projected board.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Workspace configuration (`.kanban/config.yaml`, env, flags)
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup
//! - [`util`] - Task id generation

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod util;

pub use cli::run;
