//! Node driver abstraction and the fan-out execution engines.

pub mod command_manager;
pub mod config_manager;
pub mod driver;
pub mod drivers;
pub mod registry;
pub mod types;

pub use command_manager::{CommandManager, CommandSummary, RunOptions};
pub use config_manager::{ConfigManager, ConfigPushOptions, ConfigSource, ConfigSummary};
pub use driver::NodeDriver;
pub use registry::{DriverFactory, DriverRegistry};
pub use types::{
    CommandResult, ConfigFormat, ConfigLoadMethod, ConfigResult, ConnectionParams, DriverError,
    DriverResult,
};
