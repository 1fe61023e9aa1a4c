//! # clab-tools - Containerlab Device Toolkit
//!
//! clab-tools runs operational commands and delivers configuration across
//! the network devices of a containerlab topology. Devices are described in
//! a YAML inventory, reached through vendor-specific drivers, and operated
//! on concurrently with per-device fault isolation.
//!
//! ## Core Concepts
//!
//! - **Inventory**: YAML description of the lab's nodes (name, address,
//!   containerlab kind, credentials)
//! - **Drivers**: vendor-specific implementations of the uniform
//!   [`NodeDriver`](node::NodeDriver) contract
//! - **Registry**: maps vendor and device-type strings to driver factories,
//!   vendor taking precedence
//! - **Engines**: [`CommandManager`](node::CommandManager) and
//!   [`ConfigManager`](node::ConfigManager) fan an operation out across
//!   many devices, sequentially or through a bounded worker pool, and
//!   always return one result per device
//! - **Transport**: the SSH session layer drivers execute through
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use clab_tools::config::NodeDefaults;
//! use clab_tools::inventory::{Inventory, NodeSelector};
//! use clab_tools::node::{CommandManager, DriverRegistry, RunOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let inventory = Inventory::load("lab.yaml".as_ref())?;
//!     let nodes = inventory.select(&NodeSelector::All)?;
//!
//!     let registry = Arc::new(DriverRegistry::with_builtins());
//!     let manager = CommandManager::new(registry, NodeDefaults::default());
//!
//!     let results = manager
//!         .run(&nodes, "show version", &RunOptions::default())
//!         .await;
//!     for result in &results {
//!         println!("{}: exit {}", result.device, result.exit_code);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod inventory;
pub mod node;
pub mod output;

pub use error::{Error, Result};
