// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::chart_data::RankWindow;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "TOP_GAMES_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the default dataset files are resolved against
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub range_min: usize,
    pub range_max: usize,
    pub default_start: usize,
    pub default_end: usize,
    pub chart_width: u32,
    pub chart_height: u32,
    pub preview_rows: usize,
    pub attribution: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            range_min: 0,
            range_max: 50,
            default_start: 0,
            default_end: 20,
            chart_width: 1000,
            chart_height: 600,
            preview_rows: 5,
            attribution: "Built by DW v1.2 6-27-24".to_string(),
        }
    }
}

impl Config {
    pub fn default_window(&self) -> RankWindow {
        RankWindow::new(self.default_start, self.default_end)
    }

    /// Checks a window against the configured slider bounds.
    pub fn validate_window(&self, window: RankWindow) -> Result<RankWindow> {
        if window.start < self.range_min || window.end > self.range_max {
            anyhow::bail!(
                "Rank range {}..{} is outside the allowed bounds {}..{}",
                window.start,
                window.end,
                self.range_min,
                self.range_max
            );
        }
        if window.start > window.end {
            anyhow::bail!(
                "Rank range start {} is greater than end {}",
                window.start,
                window.end
            );
        }
        Ok(window)
    }

    /// Builds a window from optional CLI values, filling gaps from the defaults.
    pub fn window_from(&self, start: Option<usize>, end: Option<usize>) -> Result<RankWindow> {
        let window = RankWindow::new(
            start.unwrap_or(self.default_start),
            end.unwrap_or(self.default_end),
        );
        self.validate_window(window)
    }
}

/// Explicit path, then the env var, then `config.toml` in the working directory.
fn get_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Loads the config, falling back to defaults when no file exists.
/// An explicitly requested file must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config_path = get_config_path(explicit);
    if !config_path.exists() {
        if explicit.is_some() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }
        log::debug!(
            "No config at {}, using defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    config.validate_window(config.default_window())?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(path, config_str)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
