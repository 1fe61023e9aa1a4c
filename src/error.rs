//! Top-level error type for clab-tools.

use thiserror::Error;

use crate::inventory::InventoryError;
use crate::node::DriverError;

/// Result type alias for clab-tools operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for clab-tools.
#[derive(Error, Debug)]
pub enum Error {
    /// Inventory could not be loaded or a selector matched nothing.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Driver or device operation failed.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line usage beyond what clap can catch.
    #[error("Usage error: {0}")]
    Usage(String),

    /// One or more devices failed during a fan-out run.
    #[error("{failed} of {total} devices failed")]
    DevicesFailed {
        /// Devices that failed
        failed: usize,
        /// Devices attempted
        total: usize,
    },

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit status for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DevicesFailed { .. } => 1,
            Error::Usage(_) => 2,
            Error::Config(_) => 3,
            Error::Inventory(_) => 4,
            Error::Driver(_) => 5,
            Error::Io(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::DevicesFailed { failed: 1, total: 2 },
            Error::Usage("bad".into()),
            Error::Config("bad".into()),
            Error::Inventory(InventoryError::Empty),
            Error::Driver(DriverError::ExecutionFailed("x".into())),
            Error::Io(std::io::Error::other("x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
