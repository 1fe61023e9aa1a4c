//! Configuration fan-out engine: pushes configuration across many devices
//! with the same fault isolation discipline as command execution.

use futures::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, warn};

use crate::config::NodeDefaults;
use crate::inventory::Node;
use crate::node::command_manager::connection_params;
use crate::node::driver::NodeDriver;
use crate::node::registry::DriverRegistry;
use crate::node::types::{ConfigFormat, ConfigLoadMethod, ConfigResult, DriverError, DriverResult};

/// Where the configuration content comes from
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A file on the controller; read once, same content pushed everywhere
    LocalFile(PathBuf),
    /// A path already present on each device; nothing is read locally
    DeviceFile(String),
}

/// Per-invocation options for configuration delivery
#[derive(Debug, Clone)]
pub struct ConfigPushOptions {
    pub format: ConfigFormat,
    pub method: ConfigLoadMethod,
    /// Preview without leaving changes on the device
    pub dry_run: bool,
    /// Commit comment
    pub comment: Option<String>,
    pub parallel: bool,
    pub workers: usize,
}

impl Default for ConfigPushOptions {
    fn default() -> Self {
        Self {
            format: ConfigFormat::Text,
            method: ConfigLoadMethod::Merge,
            dry_run: false,
            comment: None,
            parallel: false,
            workers: 10,
        }
    }
}

/// Tally of a configuration push across devices
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Devices where no change was needed
    pub unchanged: usize,
    pub failed_devices: Vec<String>,
}

impl ConfigSummary {
    pub fn from_results(results: &[ConfigResult]) -> Self {
        let failed_devices: Vec<String> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.device.clone())
            .collect();
        let unchanged = results
            .iter()
            .filter(|r| r.success && r.diff.is_none())
            .count();
        Self {
            total: results.len(),
            succeeded: results.len() - failed_devices.len(),
            failed: failed_devices.len(),
            unchanged,
            failed_devices,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Pushes configuration to inventory nodes. One result per node, always.
pub struct ConfigManager {
    registry: Arc<DriverRegistry>,
    defaults: NodeDefaults,
}

impl ConfigManager {
    pub fn new(registry: Arc<DriverRegistry>, defaults: NodeDefaults) -> Self {
        Self { registry, defaults }
    }

    /// Push configuration from `source` to every node.
    ///
    /// A local file is read once up front; a read failure fails the whole
    /// invocation before any device is touched. Everything after that is
    /// per-device fault isolated.
    pub async fn push(
        &self,
        nodes: &[Node],
        source: &ConfigSource,
        options: &ConfigPushOptions,
    ) -> DriverResult<Vec<ConfigResult>> {
        let payload = match source {
            ConfigSource::LocalFile(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    DriverError::ConfigLoad(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Payload::Content(content)
            }
            ConfigSource::DeviceFile(path) => Payload::DevicePath(path.clone()),
        };

        if options.parallel && nodes.len() > 1 {
            Ok(self.push_parallel(nodes, payload, options).await)
        } else {
            Ok(self.push_sequential(nodes, payload, options).await)
        }
    }

    async fn push_sequential(
        &self,
        nodes: &[Node],
        payload: Payload,
        options: &ConfigPushOptions,
    ) -> Vec<ConfigResult> {
        let mut results = Vec::with_capacity(nodes.len());
        for node in nodes {
            results
                .push(push_to_node(&self.registry, &self.defaults, node, &payload, options).await);
        }
        results
    }

    async fn push_parallel(
        &self,
        nodes: &[Node],
        payload: Payload,
        options: &ConfigPushOptions,
    ) -> Vec<ConfigResult> {
        debug!(nodes = nodes.len(), workers = options.workers, "Pushing config in parallel");
        let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
        let results = Arc::new(Mutex::new(Vec::with_capacity(nodes.len())));
        let payload = Arc::new(payload);
        let options = Arc::new(options.clone());

        let handles: Vec<_> = nodes
            .iter()
            .map(|node| {
                let node = node.clone();
                let registry = Arc::clone(&self.registry);
                let defaults = self.defaults.clone();
                let payload = Arc::clone(&payload);
                let options = Arc::clone(&options);
                let semaphore = Arc::clone(&semaphore);
                let results = Arc::clone(&results);

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.unwrap();
                    let result =
                        push_to_node(&registry, &defaults, &node, &payload, &options).await;
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

/// Resolved configuration payload handed to each device task
#[derive(Debug, Clone)]
enum Payload {
    Content(String),
    DevicePath(String),
}

/// Apply the payload to one node, converting every failure into a failed
/// result.
async fn push_to_node(
    registry: &DriverRegistry,
    defaults: &NodeDefaults,
    node: &Node,
    payload: &Payload,
    options: &ConfigPushOptions,
) -> ConfigResult {
    let params = connection_params(node, defaults);

    let mut driver = match registry.resolve_and_construct(params) {
        Ok(driver) => driver,
        Err(e) => {
            warn!(node = %node.name, error = %e, "No driver for node");
            return ConfigResult::failed(&node.name, e.to_string());
        }
    };

    if let Err(e) = driver.connect().await {
        warn!(node = %node.name, error = %e, "Connection failed");
        return ConfigResult::failed(&node.name, e.to_string());
    }

    let result = apply_payload(driver.as_mut(), payload, options).await;
    driver.disconnect().await;

    match result {
        Ok(mut result) => {
            result.device = node.name.clone();
            result
        }
        Err(e) => {
            warn!(node = %node.name, error = %e, "Configuration push failed");
            ConfigResult::failed(&node.name, e.to_string())
        }
    }
}

async fn apply_payload(
    driver: &mut dyn NodeDriver,
    payload: &Payload,
    options: &ConfigPushOptions,
) -> DriverResult<ConfigResult> {
    match payload {
        Payload::Content(content) => {
            if options.dry_run {
                // Validation never alters device state
                let (valid, detail) = driver.validate_config(content, options.format).await?;
                if valid {
                    Ok(ConfigResult::no_changes(driver.name())
                        .with_message("Validation succeeded (dry run)"))
                } else {
                    Ok(ConfigResult::failed(
                        driver.name(),
                        detail.unwrap_or_else(|| "Validation failed".to_string()),
                    ))
                }
            } else {
                driver
                    .load_config(
                        content,
                        options.format,
                        options.method,
                        options.comment.as_deref(),
                    )
                    .await
            }
        }

        Payload::DevicePath(path) => {
            let result = driver
                .load_config_from_file(path, options.method, options.comment.as_deref())
                .await?;

            // Dry run against a device file really commits, then reverts;
            // nothing to revert when no change was made.
            if options.dry_run && result.success {
                let message = if result.diff.is_some() {
                    driver.rollback_config(None).await?;
                    format!("{} (rolled back)", result.message)
                } else {
                    format!("{} (dry run)", result.message)
                };
                return Ok(result.with_message(message));
            }
            Ok(result)
        }
    }
}
