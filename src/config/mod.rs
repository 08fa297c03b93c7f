use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::editor::{Bindings, ControllerSettings, HoleSeed};
use crate::parser::{POLYGON_MIN_POINTS, Parser};

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_polygon_threshold() -> usize {
    POLYGON_MIN_POINTS
}
fn default_warning_cooldown_ms() -> u64 {
    1500
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Point count from which a flat payload is read as a polygon
    #[serde(default = "default_polygon_threshold")]
    pub polygon_threshold: usize,
    #[serde(default = "default_warning_cooldown_ms")]
    pub warning_cooldown_ms: u64,
    #[serde(default)]
    pub hole_seed: HoleSeed,
    #[serde(default)]
    pub bindings: Bindings,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            polygon_threshold: default_polygon_threshold(),
            warning_cooldown_ms: default_warning_cooldown_ms(),
            hole_seed: HoleSeed::default(),
            bindings: Bindings::default(),
            verbose: default_verbose(),
        }
    }
}

impl FileConfig {
    /// Search the usual locations, returning the first config that parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config file {:?}: {:#}", path, e);
                    }
                }
            }
        }
        None
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn parser(&self) -> Parser {
        Parser::with_polygon_threshold(self.polygon_threshold)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            bindings: self.bindings,
            hole_seed: self.hole_seed,
            warning_cooldown: Duration::from_millis(self.warning_cooldown_ms),
            parser: self.parser(),
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("geoedit.toml"));
    paths.push(PathBuf::from(".geoedit.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("geoedit").join("config.toml"));
        paths.push(config_dir.join("geoedit.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".geoedit.toml"));
        paths.push(home.join(".config").join("geoedit").join("config.toml"));
    }

    paths
}
