//! The vendor-agnostic device driver contract.
//!
//! Every vendor implementation exposes the same lifecycle and the same
//! operations, so the execution engines never branch on device kind. A
//! driver instance is bound to exactly one device for its whole life.

use async_trait::async_trait;
use std::collections::HashMap;

use super::types::{CommandResult, ConfigFormat, ConfigLoadMethod, ConfigResult, DriverResult};

/// Uniform contract every node driver implements.
///
/// Lifecycle: construct (Disconnected) -> `connect` -> operations ->
/// `disconnect`. Operations invoked while disconnected return
/// [`DriverError::NotConnected`](super::types::DriverError::NotConnected).
///
/// `disconnect` never fails; transport close errors are logged and
/// swallowed so one device's teardown cannot block the next.
#[async_trait]
pub trait NodeDriver: Send + Sync {
    /// Device identifier this driver is bound to (node name)
    fn name(&self) -> &str;

    /// Whether the driver currently holds an established session
    fn is_connected(&self) -> bool;

    /// Establish the session. No-op when already connected.
    async fn connect(&mut self) -> DriverResult<()>;

    /// Tear down the session. Always leaves the driver disconnected.
    async fn disconnect(&mut self);

    /// Execute a single operational command, with an optional timeout in seconds
    async fn execute_command(
        &mut self,
        command: &str,
        timeout: Option<u64>,
    ) -> DriverResult<CommandResult>;

    /// Execute several commands in order over the same session.
    ///
    /// A failing command does not short-circuit the rest; its failure is
    /// recorded in its own result.
    async fn execute_commands(&mut self, commands: &[String]) -> DriverResult<Vec<CommandResult>> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            match self.execute_command(command, None).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    results.push(CommandResult::failure(
                        self.name(),
                        command,
                        e.to_string(),
                        1,
                        0.0,
                    ));
                }
            }
        }
        Ok(results)
    }

    /// Load configuration content onto the device and commit it.
    ///
    /// Takes the exclusive configuration lock, loads the content, computes
    /// the diff, and commits only when the diff is non-empty. The lock is
    /// released on every path, including failures. An empty diff is a
    /// successful no-change outcome, never a commit.
    async fn load_config(
        &mut self,
        content: &str,
        format: ConfigFormat,
        method: ConfigLoadMethod,
        comment: Option<&str>,
    ) -> DriverResult<ConfigResult>;

    /// Same contract as [`load_config`](Self::load_config), but the source
    /// is a file path already present on the device.
    async fn load_config_from_file(
        &mut self,
        device_path: &str,
        method: ConfigLoadMethod,
        comment: Option<&str>,
    ) -> DriverResult<ConfigResult>;

    /// Validate configuration content without applying it.
    ///
    /// Loads the content, runs the device's commit check, then rolls back
    /// and unlocks unconditionally. Returns (valid, detail); the device is
    /// never left with a pending change.
    async fn validate_config(
        &mut self,
        content: &str,
        format: ConfigFormat,
    ) -> DriverResult<(bool, Option<String>)>;

    /// Diff of any currently pending (uncommitted) configuration, or None
    async fn get_config_diff(&mut self) -> DriverResult<Option<String>>;

    /// Commit pending configuration.
    ///
    /// With `confirmed` and a non-zero `timeout_minutes`, the device
    /// auto-rolls-back unless the commit is confirmed in time.
    async fn commit_config(
        &mut self,
        comment: Option<&str>,
        confirmed: bool,
        timeout_minutes: u64,
    ) -> DriverResult<ConfigResult>;

    /// Roll back to a numbered checkpoint, or to the immediately prior
    /// state when `rollback_id` is None.
    async fn rollback_config(&mut self, rollback_id: Option<u32>) -> DriverResult<ConfigResult>;

    /// Collect device facts (hostname, model, version, serial, uptime, vendor)
    async fn get_facts(&mut self) -> DriverResult<HashMap<String, String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::types::DriverError;

    /// Minimal driver exercising the default execute_commands impl
    struct ScriptedDriver {
        name: String,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl NodeDriver for ScriptedDriver {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_connected(&self) -> bool {
            true
        }

        async fn connect(&mut self) -> DriverResult<()> {
            Ok(())
        }

        async fn disconnect(&mut self) {}

        async fn execute_command(
            &mut self,
            command: &str,
            _timeout: Option<u64>,
        ) -> DriverResult<CommandResult> {
            if self.fail_on.as_deref() == Some(command) {
                return Err(DriverError::ExecutionFailed(format!(
                    "scripted failure for '{}'",
                    command
                )));
            }
            Ok(CommandResult::success(
                &self.name,
                command,
                format!("ran {}", command),
                0.01,
            ))
        }

        async fn load_config(
            &mut self,
            _content: &str,
            _format: ConfigFormat,
            _method: ConfigLoadMethod,
            _comment: Option<&str>,
        ) -> DriverResult<ConfigResult> {
            unimplemented!()
        }

        async fn load_config_from_file(
            &mut self,
            _device_path: &str,
            _method: ConfigLoadMethod,
            _comment: Option<&str>,
        ) -> DriverResult<ConfigResult> {
            unimplemented!()
        }

        async fn validate_config(
            &mut self,
            _content: &str,
            _format: ConfigFormat,
        ) -> DriverResult<(bool, Option<String>)> {
            unimplemented!()
        }

        async fn get_config_diff(&mut self) -> DriverResult<Option<String>> {
            unimplemented!()
        }

        async fn commit_config(
            &mut self,
            _comment: Option<&str>,
            _confirmed: bool,
            _timeout_minutes: u64,
        ) -> DriverResult<ConfigResult> {
            unimplemented!()
        }

        async fn rollback_config(
            &mut self,
            _rollback_id: Option<u32>,
        ) -> DriverResult<ConfigResult> {
            unimplemented!()
        }

        async fn get_facts(&mut self) -> DriverResult<HashMap<String, String>> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_execute_commands_preserves_order() {
        let mut driver = ScriptedDriver {
            name: "r1".to_string(),
            fail_on: None,
        };
        let commands = vec!["show version".to_string(), "show interfaces".to_string()];
        let results = driver.execute_commands(&commands).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].command, "show version");
        assert_eq!(results[1].command, "show interfaces");
        assert!(results.iter().all(|r| r.is_success()));
    }

    #[tokio::test]
    async fn test_execute_commands_does_not_short_circuit() {
        let mut driver = ScriptedDriver {
            name: "r1".to_string(),
            fail_on: Some("bad command".to_string()),
        };
        let commands = vec![
            "show version".to_string(),
            "bad command".to_string(),
            "show interfaces".to_string(),
        ];
        let results = driver.execute_commands(&commands).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert!(!results[1].is_success());
        assert!(results[1].error.as_deref().unwrap().contains("scripted"));
        assert!(results[2].is_success());
    }
}
