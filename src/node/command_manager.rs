//! Command fan-out engine: runs one operational command across many devices.

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, warn};

use crate::config::NodeDefaults;
use crate::inventory::Node;
use crate::node::registry::DriverRegistry;
use crate::node::types::{CommandResult, ConnectionParams};

/// Per-invocation options for command execution
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Command timeout in seconds
    pub timeout: Option<u64>,
    /// Run devices concurrently
    pub parallel: bool,
    /// Maximum concurrent device sessions in parallel mode
    pub workers: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            parallel: false,
            workers: 10,
        }
    }
}

/// Tally of a command run across devices
#[derive(Debug, Clone, Serialize)]
pub struct CommandSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Names of devices whose command failed
    pub failed_devices: Vec<String>,
}

impl CommandSummary {
    /// Build a summary from per-device results
    pub fn from_results(results: &[CommandResult]) -> Self {
        let failed_devices: Vec<String> = results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.device.clone())
            .collect();
        Self {
            total: results.len(),
            succeeded: results.len() - failed_devices.len(),
            failed: failed_devices.len(),
            failed_devices,
        }
    }

    /// Whether every device succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Runs operational commands across inventory nodes with per-device fault
/// isolation: every node yields exactly one result, and one node's failure
/// never aborts the batch.
pub struct CommandManager {
    registry: Arc<DriverRegistry>,
    defaults: NodeDefaults,
}

impl CommandManager {
    pub fn new(registry: Arc<DriverRegistry>, defaults: NodeDefaults) -> Self {
        Self { registry, defaults }
    }

    /// Run one command on every node.
    ///
    /// Returns exactly one result per node. Parallel mode collects results
    /// in completion order; sequential mode preserves input order.
    pub async fn run(
        &self,
        nodes: &[Node],
        command: &str,
        options: &RunOptions,
    ) -> Vec<CommandResult> {
        if options.parallel && nodes.len() > 1 {
            self.run_parallel(nodes, command, options).await
        } else {
            self.run_sequential(nodes, command, options).await
        }
    }

    async fn run_sequential(
        &self,
        nodes: &[Node],
        command: &str,
        options: &RunOptions,
    ) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(nodes.len());
        for node in nodes {
            results.push(run_on_node(&self.registry, &self.defaults, node, command, options.timeout).await);
        }
        results
    }

    async fn run_parallel(
        &self,
        nodes: &[Node],
        command: &str,
        options: &RunOptions,
    ) -> Vec<CommandResult> {
        debug!(nodes = nodes.len(), workers = options.workers, "Running command in parallel");
        let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
        let results = Arc::new(Mutex::new(Vec::with_capacity(nodes.len())));

        let handles: Vec<_> = nodes
            .iter()
            .map(|node| {
                let node = node.clone();
                let command = command.to_string();
                let timeout = options.timeout;
                let registry = Arc::clone(&self.registry);
                let defaults = self.defaults.clone();
                let semaphore = Arc::clone(&semaphore);
                let results = Arc::clone(&results);

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.unwrap();
                    let result = run_on_node(&registry, &defaults, &node, &command, timeout).await;
                    results.lock().await.push(result);
                })
            })
            .collect();

        join_all(handles).await;

        match Arc::try_unwrap(results) {
            Ok(mutex) => mutex.into_inner(),
            Err(results) => results.lock().await.clone(),
        }
    }
}

/// Build connection parameters for a node, falling back to global defaults
/// for any credential the node record does not override.
pub(crate) fn connection_params(node: &Node, defaults: &NodeDefaults) -> ConnectionParams {
    let username = node
        .username
        .clone()
        .unwrap_or_else(|| defaults.default_username.clone());
    let password = node.password.clone().or_else(|| defaults.default_password.clone());
    let port = node.port.unwrap_or(defaults.default_port);

    let mut params = ConnectionParams::new(&node.host, username)
        .with_port(port)
        .with_timeout(defaults.timeout)
        .with_device_type(&node.kind);
    params.password = password;
    params.key_file = defaults.key_file.clone();
    params.vendor = node.vendor.clone();
    params
}

/// Execute one command on one node, converting every failure into a failed
/// result so the caller always gets exactly one result per node.
async fn run_on_node(
    registry: &DriverRegistry,
    defaults: &NodeDefaults,
    node: &Node,
    command: &str,
    timeout: Option<u64>,
) -> CommandResult {
    let params = connection_params(node, defaults);

    let mut driver = match registry.resolve_and_construct(params) {
        Ok(driver) => driver,
        Err(e) => {
            warn!(node = %node.name, error = %e, "No driver for node");
            return CommandResult::failure(&node.name, command, e.to_string(), 1, 0.0);
        }
    };

    if let Err(e) = driver.connect().await {
        warn!(node = %node.name, error = %e, "Connection failed");
        return CommandResult::failure(&node.name, command, e.to_string(), 1, 0.0);
    }

    let result = driver.execute_command(command, timeout).await;
    driver.disconnect().await;

    match result {
        Ok(mut result) => {
            // Drivers identify devices by host; results carry the node name
            result.device = node.name.clone();
            result
        }
        Err(e) => {
            warn!(node = %node.name, error = %e, "Command execution failed");
            CommandResult::failure(&node.name, command, e.to_string(), 1, 0.0)
        }
    }
}
