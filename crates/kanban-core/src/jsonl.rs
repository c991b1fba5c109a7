//! JSONL snapshot files for tasks and statuses.
//!
//! One JSON object per line. Blank lines are skipped; writes go to a
//! temporary file that is renamed into place.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{KanbanError, Result};
use crate::model::{Status, Task};

/// Load tasks from a JSONL file.
///
/// # Errors
///
/// Returns `FileNotFound` if the file is missing, `Io` if it cannot be read,
/// or `JsonlParse` if any line is invalid.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    load(path)
}

/// Load statuses from a JSONL file.
///
/// # Errors
///
/// Returns `FileNotFound` if the file is missing, `Io` if it cannot be read,
/// or `JsonlParse` if any line is invalid.
pub fn load_statuses(path: &Path) -> Result<Vec<Status>> {
    load(path)
}

/// Save tasks to a JSONL file with atomic write.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    save(path, tasks)
}

/// Save statuses to a JSONL file with atomic write.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save_statuses(path: &Path, statuses: &[Status]) -> Result<()> {
    save(path, statuses)
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KanbanError::FileNotFound(path.to_path_buf())
        } else {
            KanbanError::Io(e)
        }
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: T = serde_json::from_str(trimmed).map_err(|e| KanbanError::JsonlParse {
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

fn save<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("jsonl.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    for record in records {
        let json = serde_json::to_string(record)?;
        writeln!(file, "{json}")?;
    }
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
