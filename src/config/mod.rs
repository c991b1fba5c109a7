//! Configuration management for `kb`.
//!
//! Settings resolve in layers, later layers winning:
//! - Defaults (team `default`, data directory `.kanban`)
//! - Workspace config (`.kanban/config.yaml`)
//! - Environment variables (`KANBAN_TEAM`, `KANBAN_DATA_DIR`)
//! - Command-line flags

use std::fs;
use std::path::{Path, PathBuf};

use kanban_core::{KanbanError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CONFIG_DIR: &str = ".kanban";
pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_TEAM: &str = "default";

pub const ENV_TEAM: &str = "KANBAN_TEAM";
pub const ENV_DATA_DIR: &str = "KANBAN_DATA_DIR";

/// Contents of `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Read a config file. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file exists but is not valid YAML for this schema.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Some(Self::default()));
        }
        serde_yaml::from_str(&raw)
            .map(Some)
            .map_err(|e| KanbanError::Config(format!("{}: {e}", path.display())))
    }

    /// Write this config as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| KanbanError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)?;
        Ok(())
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub team: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanConfig {
    pub team: String,
    pub data_dir: PathBuf,
}

impl KanbanConfig {
    /// Directory holding one team's JSONL snapshots.
    #[must_use]
    pub fn team_dir(&self) -> PathBuf {
        self.data_dir.join(&self.team)
    }
}

/// Path of the workspace config file under `root`.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load configuration for a workspace rooted at `root`.
///
/// # Errors
///
/// Returns an error if the config file is unreadable or malformed, or if the
/// resolved team name is blank.
pub fn load_config(root: &Path, overrides: &CliOverrides) -> Result<KanbanConfig> {
    let path = config_path(root);
    let file = ConfigFile::load(&path)?.unwrap_or_default();
    debug!(path = %path.display(), ?file, "config file read");
    resolve(root, file, |key| std::env::var(key).ok(), overrides)
}

fn resolve(
    root: &Path,
    file: ConfigFile,
    env: impl Fn(&str) -> Option<String>,
    overrides: &CliOverrides,
) -> Result<KanbanConfig> {
    let non_blank = |value: String| (!value.trim().is_empty()).then_some(value);

    let team = overrides
        .team
        .clone()
        .or_else(|| env(ENV_TEAM).and_then(non_blank))
        .or(file.team)
        .unwrap_or_else(|| DEFAULT_TEAM.to_string());
    if team.trim().is_empty() {
        return Err(KanbanError::Config("team cannot be empty".to_string()));
    }

    let data_dir = overrides
        .data_dir
        .clone()
        .or_else(|| env(ENV_DATA_DIR).and_then(non_blank).map(PathBuf::from))
        .or(file.data_dir)
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR));
    let data_dir = if data_dir.is_absolute() {
        data_dir
    } else {
        root.join(data_dir)
    };

    Ok(KanbanConfig { team, data_dir })
}
