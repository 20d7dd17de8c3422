use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::model::ViewMode;

/// User preferences stored in the platform config directory.
///
/// Every field is optional; command-line flags take precedence.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub roster_path: Option<PathBuf>,
    pub default_view: Option<ViewMode>,
    pub anchor_date: Option<NaiveDate>,
    pub aggregate_cells: bool,
    pub log_to_file: bool,
}

impl Config {
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "staffgrid", "staffgrid")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Load the config file, falling back to defaults when it does not exist
    pub fn load_or_default() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_data = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Resolve the roster path: explicit flag first, then the config file
    pub fn roster_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        flag.or_else(|| self.roster_path.clone()).ok_or_else(|| {
            let location = Self::get_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "config.json".to_string());
            ConfigError::RosterNotConfigured(location).into()
        })
    }

    pub fn view(&self, flag: Option<ViewMode>) -> ViewMode {
        flag.or(self.default_view).unwrap_or_default()
    }
}
