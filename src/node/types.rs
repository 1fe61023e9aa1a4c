//! Value types shared by the driver contract and the execution engines.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur inside a device driver or during driver resolution
#[derive(Error, Debug)]
pub enum DriverError {
    /// No registered driver matches the device's vendor or device type.
    #[error("No driver found for vendor '{vendor}' or device type '{device_type}'")]
    NoDriverFound {
        /// Vendor string that was attempted ("-" when absent)
        vendor: String,
        /// Device-type string that was attempted ("-" when absent)
        device_type: String,
    },

    /// Network or protocol failure while connecting.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Credentials rejected by the device.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Operation attempted before connect().
    #[error("Not connected to device '{0}'")]
    NotConnected(String),

    /// Command execution failed at the transport or device level.
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    /// Could not take the exclusive configuration lock.
    #[error("Failed to lock configuration: {0}")]
    LockFailed(String),

    /// Configuration content was rejected on load.
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    /// Commit was rejected by the device.
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Rollback was rejected by the device.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// Commit-check rejected the candidate configuration.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Operation timed out.
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    /// Invalid parameter or unusable connection descriptor.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (local file reads, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

impl From<crate::connection::ConnectionError> for DriverError {
    fn from(err: crate::connection::ConnectionError) -> Self {
        use crate::connection::ConnectionError;
        match err {
            ConnectionError::AuthenticationFailed(msg) => DriverError::AuthenticationFailed(msg),
            ConnectionError::Timeout(secs) => DriverError::Timeout(secs),
            ConnectionError::ConnectionFailed(msg) | ConnectionError::SshError(msg) => {
                DriverError::ConnectionFailed(msg)
            }
            ConnectionError::ConnectionClosed => {
                DriverError::ConnectionFailed("connection closed".to_string())
            }
            ConnectionError::InvalidConfig(msg) => DriverError::InvalidConfig(msg),
            ConnectionError::ExecutionFailed(msg) => DriverError::ExecutionFailed(msg),
            ConnectionError::IoError(e) => DriverError::Io(e),
        }
    }
}

/// Immutable descriptor of how to reach one device.
///
/// Used only to select and construct a driver; carries no behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Host address (IP or resolvable name)
    pub host: String,
    /// Login username
    pub username: String,
    /// Login password (optional when key auth is available)
    pub password: Option<String>,
    /// SSH port
    pub port: u16,
    /// Connection timeout in seconds
    pub timeout: u64,
    /// Private key file for key-based authentication
    pub key_file: Option<PathBuf>,
    /// Containerlab kind / device type string
    pub device_type: Option<String>,
    /// Vendor string (takes precedence over device_type for driver selection)
    pub vendor: Option<String>,
}

impl ConnectionParams {
    /// Create connection parameters with the standard defaults (port 22, 30s timeout)
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: None,
            port: 22,
            timeout: 30,
            key_file: None,
            device_type: None,
            vendor: None,
        }
    }

    /// Set the password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the private key file path
    pub fn with_key_file(mut self, key_file: impl Into<PathBuf>) -> Self {
        self.key_file = Some(key_file.into());
        self
    }

    /// Set the device type string
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Set the vendor string
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }
}

/// Outcome of one command on one device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Device identifier (node name)
    pub device: String,
    /// The command that was executed
    pub command: String,
    /// Captured output
    pub output: String,
    /// Error text, present exactly when the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Elapsed duration in seconds
    pub duration: f64,
}

impl CommandResult {
    /// Create a successful result (exit code 0, no error)
    pub fn success(
        device: impl Into<String>,
        command: impl Into<String>,
        output: impl Into<String>,
        duration: f64,
    ) -> Self {
        Self {
            device: device.into(),
            command: command.into(),
            output: output.into(),
            error: None,
            exit_code: 0,
            duration,
        }
    }

    /// Create a failed result; the exit code must be non-zero
    pub fn failure(
        device: impl Into<String>,
        command: impl Into<String>,
        error: impl Into<String>,
        exit_code: i32,
        duration: f64,
    ) -> Self {
        Self {
            device: device.into(),
            command: command.into(),
            output: String::new(),
            error: Some(error.into()),
            exit_code: if exit_code == 0 { 1 } else { exit_code },
            duration,
        }
    }

    /// Whether the command succeeded
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Outcome of one configuration operation on one device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResult {
    /// Device identifier (node name)
    pub device: String,
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Computed diff; present only when a change was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    /// Error text when the operation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rollback checkpoint identifier, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_id: Option<u32>,
}

impl ConfigResult {
    /// A change was computed and applied
    pub fn applied(
        device: impl Into<String>,
        message: impl Into<String>,
        diff: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            success: true,
            message: message.into(),
            diff: Some(diff.into()),
            error: None,
            rollback_id: None,
        }
    }

    /// The operation succeeded without computing a diff (commit, rollback)
    pub fn succeeded(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            success: true,
            message: message.into(),
            diff: None,
            error: None,
            rollback_id: None,
        }
    }

    /// No changes were detected; a distinct successful terminal state
    pub fn no_changes(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            success: true,
            message: "No configuration changes detected".to_string(),
            diff: None,
            error: None,
            rollback_id: None,
        }
    }

    /// The operation failed
    pub fn failed(device: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            device: device.into(),
            success: false,
            message: format!("Configuration operation failed: {}", error),
            diff: None,
            error: Some(error),
            rollback_id: None,
        }
    }

    /// Attach a rollback checkpoint identifier
    pub fn with_rollback_id(mut self, rollback_id: u32) -> Self {
        self.rollback_id = Some(rollback_id);
        self
    }

    /// Replace the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Syntax dialect of submitted configuration content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Hierarchical text format
    #[default]
    Text,
    /// Set commands format (e.g., "set system host-name r1")
    Set,
    /// XML format
    Xml,
    /// JSON format
    Json,
}

impl FromStr for ConfigFormat {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "hierarchical" => Ok(ConfigFormat::Text),
            "set" | "commands" => Ok(ConfigFormat::Set),
            "xml" => Ok(ConfigFormat::Xml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(DriverError::InvalidConfig(format!(
                "Invalid config format '{}'. Valid formats: text, set, xml, json",
                s
            ))),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Text => write!(f, "text"),
            ConfigFormat::Set => write!(f, "set"),
            ConfigFormat::Xml => write!(f, "xml"),
            ConfigFormat::Json => write!(f, "json"),
        }
    }
}

/// How new configuration content combines with the device's existing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoadMethod {
    /// Merge configuration with existing
    #[default]
    Merge,
    /// Override entire configuration
    Override,
    /// Replace matching configuration
    Replace,
}

impl FromStr for ConfigLoadMethod {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(ConfigLoadMethod::Merge),
            "override" => Ok(ConfigLoadMethod::Override),
            "replace" => Ok(ConfigLoadMethod::Replace),
            _ => Err(DriverError::InvalidConfig(format!(
                "Invalid load method '{}'. Valid methods: merge, override, replace",
                s
            ))),
        }
    }
}

impl fmt::Display for ConfigLoadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadMethod::Merge => write!(f, "merge"),
            ConfigLoadMethod::Override => write!(f, "override"),
            ConfigLoadMethod::Replace => write!(f, "replace"),
        }
    }
}
