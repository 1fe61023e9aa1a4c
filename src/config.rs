//! Layered settings: built-in defaults, then an optional config file,
//! then `CLAB_TOOLS_*` environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global defaults applied to nodes that don't override them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    /// Username used when a node record has none
    pub default_username: String,
    /// Password used when a node record has none
    pub default_password: Option<String>,
    /// SSH port used when a node record has none
    pub default_port: u16,
    /// Connection timeout in seconds
    pub timeout: u64,
    /// Private key file for key-based authentication
    pub key_file: Option<PathBuf>,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password: None,
            default_port: 22,
            timeout: 30,
            key_file: None,
        }
    }
}

/// Fan-out engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Maximum concurrent device sessions in parallel mode
    pub workers: usize,
    /// Whether to run in parallel by default
    pub parallel: bool,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            workers: 10,
            parallel: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Output color settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Whether colored output is enabled
    pub enabled: bool,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default inventory file path
    pub inventory: Option<PathBuf>,
    /// Node credential defaults
    pub node: NodeDefaults,
    /// Fan-out settings
    pub runner: RunnerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Color settings
    pub colors: ColorSettings,
}

impl Settings {
    /// Load settings: defaults, then the first existing config file, then
    /// environment overrides.
    ///
    /// When `explicit_path` is given the file must exist; otherwise the
    /// standard locations are probed and all may be absent.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = explicit_path {
            settings.merge_from_file(path)?;
        } else {
            for path in Self::default_paths() {
                if path.exists() {
                    settings.merge_from_file(&path)?;
                    break;
                }
            }
        }

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Standard config file locations, probed in order
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/clab-tools/config.yaml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".clab-tools.yaml"));
        }
        paths.push(PathBuf::from("clab-tools.yaml"));
        paths
    }

    /// Merge a config file into the current settings, dispatching the
    /// parser on the file extension.
    fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let parsed: Settings = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in '{}'", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in '{}'", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in '{}'", path.display()))?,
        };

        debug!(path = %path.display(), "Loaded config file");
        *self = parsed;
        Ok(())
    }

    /// Apply `CLAB_TOOLS_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(username) = std::env::var("CLAB_TOOLS_USERNAME") {
            self.node.default_username = username;
        }
        if let Ok(password) = std::env::var("CLAB_TOOLS_PASSWORD") {
            self.node.default_password = Some(password);
        }
        if let Ok(port) = std::env::var("CLAB_TOOLS_PORT") {
            if let Ok(port) = port.parse() {
                self.node.default_port = port;
            }
        }
        if let Ok(timeout) = std::env::var("CLAB_TOOLS_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                self.node.timeout = timeout;
            }
        }
        if let Ok(workers) = std::env::var("CLAB_TOOLS_WORKERS") {
            if let Ok(workers) = workers.parse() {
                self.runner.workers = workers;
            }
        }
        if let Ok(inventory) = std::env::var("CLAB_TOOLS_INVENTORY") {
            self.inventory = Some(PathBuf::from(inventory));
        }
        if std::env::var("CLAB_TOOLS_NO_COLOR").is_ok() || std::env::var("NO_COLOR").is_ok() {
            self.colors.enabled = false;
        }
    }
}
