//! Subcommand implementations.

pub mod config;
pub mod drivers;
pub mod facts;
pub mod nodes;
pub mod run;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::inventory::{Inventory, Node, NodeSelector};
use crate::node::DriverRegistry;
use crate::output::OutputFormat;

/// Common context shared between commands
pub struct CommandContext {
    /// Application settings
    pub settings: Settings,
    /// Inventory path (CLI flag wins over settings)
    pub inventory_path: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Driver registry
    pub registry: Arc<DriverRegistry>,
}

impl CommandContext {
    /// Create a command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, settings: Settings) -> Self {
        let inventory_path = cli.inventory.clone().or_else(|| settings.inventory.clone());
        Self {
            settings,
            inventory_path,
            format: cli.output,
            registry: Arc::new(DriverRegistry::with_builtins()),
        }
    }

    /// Load the inventory from the configured path
    pub fn load_inventory(&self) -> Result<Inventory> {
        let path = self.inventory_path.as_deref().ok_or_else(|| {
            Error::Usage(
                "No inventory given; use -i/--inventory or set CLAB_TOOLS_INVENTORY".to_string(),
            )
        })?;
        Ok(Inventory::load(path)?)
    }

    /// Load the inventory and resolve the selector against it
    pub fn select_nodes(&self, selector: &NodeSelector) -> Result<Vec<Node>> {
        let inventory = self.load_inventory()?;
        Ok(inventory.select(selector)?)
    }
}
