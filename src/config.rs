//! Configuration file handling for termreel.
//!
//! Loads defaults from `~/.config/termreel/config.toml` or a custom path.
//! Command-line flags override anything set here. The file is only ever read.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rasterizer used when neither the config file nor `--rasterizer` names one.
pub const DEFAULT_RASTERIZER: &str = "jp2a";

/// Per-tick time budget for draining keyboard input.
pub const DEFAULT_INPUT_BUDGET: Duration = Duration::from_millis(10);

/// Configuration file structure for termreel.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub rasterizer: RasterizerConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default = "default_true")]
    pub show_hud: bool,
    #[serde(default = "default_input_budget_ms")]
    pub input_budget_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fps: None,
            interactive: false,
            show_hud: true,
            input_budget_ms: default_input_budget_ms(),
        }
    }
}

impl PlayerConfig {
    /// Input budget per tick, never below 1ms.
    pub fn input_budget(&self) -> Duration {
        Duration::from_millis(self.input_budget_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct RasterizerConfig {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub extra_options: Vec<String>,
}

impl RasterizerConfig {
    pub fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(DEFAULT_RASTERIZER)
    }
}

fn default_true() -> bool {
    true
}

fn default_input_budget_ms() -> u64 {
    DEFAULT_INPUT_BUDGET.as_millis() as u64
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("termreel")
        .join("config.toml")
}
