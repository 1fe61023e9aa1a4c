//! Transport layer for device communication.
//!
//! Drivers talk to devices through the [`Transport`] trait so that the
//! actual wire mechanism (SSH today) stays out of the driver contract.
//! One production implementation is provided: [`SshTransport`], a pure-Rust
//! SSH client behind the default `russh` feature.

#[cfg(feature = "russh")]
pub mod russh;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "russh")]
pub use russh::SshTransport;

/// Errors that can occur during transport operations.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Failed to establish the initial connection to the host.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication was rejected by the remote host.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Command execution failed (not to be confused with non-zero exit code).
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    /// Connection or operation timed out.
    #[error("Connection timeout after {0} seconds")]
    Timeout(u64),

    /// Connection was closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Configuration is invalid or incomplete.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// SSH-specific error from the underlying implementation.
    #[error("SSH error: {0}")]
    SshError(String),

    /// I/O error during connection operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for transport operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// The result of executing a command over a transport.
///
/// Contains the exit code, stdout, stderr, and a convenience boolean
/// indicating whether the command succeeded (exit code 0).
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command (0 typically indicates success).
    pub exit_code: i32,
    /// Content written to standard output.
    pub stdout: String,
    /// Content written to standard error.
    pub stderr: String,
    /// Convenience flag: `true` if `exit_code == 0`.
    pub success: bool,
}

impl CommandOutput {
    /// Create a new successful command output
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: 0,
            stdout,
            stderr,
            success: true,
        }
    }

    /// Create a new failed command output
    pub fn failure(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            success: false,
        }
    }

    /// Get the combined output (stdout + stderr)
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// The transport trait drivers execute device commands through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Get the transport identifier (user@host:port)
    fn identifier(&self) -> &str;

    /// Check if the transport session is still alive
    async fn is_alive(&self) -> bool;

    /// Execute a command on the device, with an optional timeout in seconds
    async fn execute(&self, command: &str, timeout: Option<u64>)
        -> ConnectionResult<CommandOutput>;

    /// Close the transport session
    async fn close(&self) -> ConnectionResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_success() {
        let output = CommandOutput::success("output".to_string(), String::new());
        assert!(output.success);
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "output");
    }

    #[test]
    fn test_command_output_failure() {
        let output = CommandOutput::failure(1, String::new(), "error".to_string());
        assert!(!output.success);
        assert_eq!(output.exit_code, 1);
        assert_eq!(output.stderr, "error");
    }

    #[test]
    fn test_combined_output() {
        let both = CommandOutput::failure(1, "out".to_string(), "err".to_string());
        assert_eq!(both.combined_output(), "out\nerr");

        let only_stdout = CommandOutput::success("out".to_string(), String::new());
        assert_eq!(only_stdout.combined_output(), "out");

        let only_stderr = CommandOutput::failure(1, String::new(), "err".to_string());
        assert_eq!(only_stderr.combined_output(), "err");
    }
}
