//! Configuration for the visualizer.
//!
//! Configuration sources (highest priority first):
//! 1. PIPEVIZ_CONFIG environment variable (path to a config file)
//! 2. Config file (.pipeviz/config.yaml in the current directory or a parent)
//! 3. User config file (<config dir>/pipeviz/config.yaml)
//! 4. Defaults
//!
//! PIPEVIZ_LAYOUT (flat/grouped) overrides the layout strategy from any source.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::EventTypeConfig;
use crate::layout::{LayoutConfig, LayoutStrategy};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<VisualizerConfig, String>> = OnceLock::new();

const CONFIG_ENV: &str = "PIPEVIZ_CONFIG";
const LAYOUT_ENV: &str = "PIPEVIZ_LAYOUT";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub event_types: EventTypeConfig,
}

/// Viewer chrome toggles, passed through to JSON consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_controls: bool,
    #[serde(default = "default_true")]
    pub show_minimap: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_controls: true,
            show_minimap: true,
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisualizerConfig {
    pub layout: LayoutConfig,
    pub display: DisplayConfig,
    /// Caller event types, layered over the built-in defaults by the registry
    pub event_types: EventTypeConfig,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".pipeviz").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Per-user config file, if one exists
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("pipeviz").join("config.yaml");
    path.exists().then_some(path)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve configuration from an explicit file choice and layout override
fn resolve(config_file: Option<PathBuf>, layout_override: Option<&str>) -> Result<VisualizerConfig> {
    let mut resolved = match config_file {
        Some(path) => {
            let file = load_config_file(&path)?;
            VisualizerConfig {
                layout: file.layout,
                display: file.display,
                event_types: file.event_types,
                config_file: Some(path),
            }
        }
        None => VisualizerConfig::default(),
    };

    if let Some(strategy) = layout_override {
        let strategy: LayoutStrategy = strategy
            .parse()
            .with_context(|| format!("Invalid {} value", LAYOUT_ENV))?;
        resolved.layout.strategy = strategy;
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<VisualizerConfig> {
    let config_file = match std::env::var(CONFIG_ENV) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => {
            let cwd = std::env::current_dir().context("Failed to determine current directory")?;
            find_config_file(&cwd).or_else(user_config_file)
        }
    };

    let layout_override = std::env::var(LAYOUT_ENV).ok();
    resolve(config_file, layout_override.as_deref())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static VisualizerConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<VisualizerConfig> {
    load_config()
}
