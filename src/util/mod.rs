//! Utility helpers for the `kb` binary.

pub mod id;

pub use id::{DEFAULT_PREFIX, TaskIdGenerator};
