//! JunOS driver: drives Juniper devices over the SSH CLI.
//!
//! All configuration work happens inside `cli -c 'configure exclusive; ...;
//! exit'` scripts, so the exclusive lock is taken at the start of every
//! script and released when the script exits, on success and failure alike.
//! Configuration content is staged into a device-side temp file and loaded
//! from there.
//!
//! A load-and-commit spans two such scripts (probe, then commit), because
//! exclusive mode discards the candidate on exit and a script cannot branch
//! on the probe's diff. The lock is therefore not held across the gap; the
//! commit script compensates by re-computing the diff under its own lock
//! and reporting that diff.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::connection::{CommandOutput, Transport};
use crate::node::driver::NodeDriver;
use crate::node::registry::DriverFactory;
use crate::node::types::{
    CommandResult, ConfigFormat, ConfigLoadMethod, ConfigResult, ConnectionParams, DriverError,
    DriverResult,
};

/// Device-side staging path for configuration content
const CONFIG_TEMP_FILE: &str = "/var/tmp/clab_tools_config.tmp";

/// Containerlab kinds served by this driver
const DEVICE_TYPES: &[&str] = &[
    "juniper_vjunosrouter",
    "juniper_vjunosswitch",
    "juniper_vjunosevolved",
    "juniper_vmx",
    "juniper_vsrx",
    "vr-vmx",
];

/// Escape a string for embedding inside a single-quoted shell argument
fn shell_escape(s: &str) -> String {
    s.replace('\'', "'\\''")
}

/// Build a `cli -c` script that enters exclusive configuration mode, runs
/// the given commands, and exits.
fn config_script(commands: &[&str]) -> String {
    format!(
        "cli -c 'configure exclusive; {}; exit'",
        commands.join("; ")
    )
}

/// Build the `load` command for the given method and format
fn load_command(method: ConfigLoadMethod, format: ConfigFormat, path: &str) -> String {
    // Text is the CLI's default format and takes no keyword
    let format_opt = match format {
        ConfigFormat::Text => "",
        ConfigFormat::Set => "set",
        ConfigFormat::Xml => "xml",
        ConfigFormat::Json => "json",
    };

    if format_opt.is_empty() {
        format!("load {} {}", method, path)
    } else {
        format!("load {} {} {}", method, format_opt, path)
    }
}

/// Build the `commit` command with optional confirm timeout and comment
fn commit_command(comment: Option<&str>, confirmed: bool, timeout_minutes: u64) -> String {
    let mut cmd = String::from("commit");
    if confirmed && timeout_minutes > 0 {
        cmd.push_str(&format!(" confirmed {}", timeout_minutes));
    }
    if let Some(comment) = comment {
        let escaped = comment.replace('"', r#"\""#);
        cmd.push_str(&format!(r#" comment "{}""#, escaped));
    }
    cmd
}

/// Driver for JunOS devices (vMX, vSRX, vJunos variants).
pub struct JuniperDriver {
    name: String,
    params: ConnectionParams,
    transport: Option<Arc<dyn Transport>>,
}

impl JuniperDriver {
    /// Create a driver that will open an SSH session on connect()
    pub fn new(params: ConnectionParams) -> Self {
        Self {
            name: params.host.clone(),
            params,
            transport: None,
        }
    }

    /// Create a driver over an already-established transport.
    ///
    /// Used by tests and by callers supplying their own transport; the
    /// driver counts as connected immediately.
    pub fn with_transport(params: ConnectionParams, transport: Arc<dyn Transport>) -> Self {
        Self {
            name: params.host.clone(),
            params,
            transport: Some(transport),
        }
    }

    fn transport(&self) -> DriverResult<&Arc<dyn Transport>> {
        self.transport
            .as_ref()
            .ok_or_else(|| DriverError::NotConnected(self.name.clone()))
    }

    /// Run a raw shell command on the device
    async fn run_shell(&self, command: &str, timeout: Option<u64>) -> DriverResult<CommandOutput> {
        let transport = self.transport()?;
        Ok(transport.execute(command, timeout).await?)
    }

    /// Run an operational-mode CLI command
    async fn run_operational(
        &self,
        command: &str,
        timeout: Option<u64>,
    ) -> DriverResult<CommandOutput> {
        let script = format!("cli -c '{}'", shell_escape(command));
        self.run_shell(&script, timeout).await
    }

    /// Run a configuration-mode script under the exclusive lock
    async fn run_config(&self, commands: &[&str]) -> DriverResult<CommandOutput> {
        let script = config_script(commands);
        let output = self.run_shell(&script, None).await?;

        if output.combined_output().contains("configuration database locked") {
            return Err(DriverError::LockFailed(format!(
                "{}: configuration database locked",
                self.name
            )));
        }
        Ok(output)
    }

    /// Stage configuration content into the device-side temp file
    async fn stage_config(&self, content: &str) -> DriverResult<()> {
        let cmd = format!("echo '{}' > {}", shell_escape(content), CONFIG_TEMP_FILE);
        let output = self.run_shell(&cmd, None).await?;
        if !output.success {
            return Err(DriverError::ConfigLoad(format!(
                "Failed to stage configuration on {}: {}",
                self.name,
                output.combined_output()
            )));
        }
        Ok(())
    }

    /// Remove the staging file, ignoring failures
    async fn cleanup_staged(&self) {
        if let Err(e) = self
            .run_shell(&format!("rm -f {}", CONFIG_TEMP_FILE), None)
            .await
        {
            debug!(device = %self.name, error = %e, "Failed to remove staged config file");
        }
    }

    /// Load the config at `device_path`, capture the diff, and discard.
    ///
    /// Leaves no pending change; the candidate is rolled back before the
    /// script exits.
    async fn probe_diff(
        &self,
        device_path: &str,
        method: ConfigLoadMethod,
        format: ConfigFormat,
    ) -> DriverResult<String> {
        let load = load_command(method, format, device_path);
        let output = self
            .run_config(&[&load, "show | compare", "rollback 0"])
            .await?;

        if !output.success && !output.stdout.contains("load complete") {
            return Err(DriverError::ConfigLoad(format!(
                "Failed to load configuration on {}: {}",
                self.name,
                output.combined_output()
            )));
        }
        Ok(extract_diff(&output.stdout))
    }

    /// Load the config at `device_path`, re-verify the diff under the same
    /// lock, and commit it. Returns the diff that was actually committed.
    async fn apply(
        &self,
        device_path: &str,
        method: ConfigLoadMethod,
        format: ConfigFormat,
        comment: Option<&str>,
    ) -> DriverResult<String> {
        let load = load_command(method, format, device_path);
        let commit = commit_command(comment, false, 0);
        let output = self
            .run_config(&[&load, "show | compare", &commit])
            .await?;

        if output.success || output.stdout.contains("commit complete") {
            Ok(extract_diff(&output.stdout))
        } else {
            Err(DriverError::CommitFailed(format!(
                "Commit failed on {}: {}",
                self.name,
                output.combined_output()
            )))
        }
    }

    /// Shared implementation of load_config / load_config_from_file.
    ///
    /// Exclusive mode discards the candidate when its script exits, so a
    /// conditional commit cannot live in one script. The probe session
    /// decides whether to proceed; the commit session then holds its own
    /// lock and re-computes the diff, and that re-verified diff is what
    /// the result reports. Another operator committing between the two
    /// sessions changes the re-verified diff, never what gets reported.
    async fn load_and_commit(
        &mut self,
        device_path: &str,
        method: ConfigLoadMethod,
        format: ConfigFormat,
        comment: Option<&str>,
    ) -> DriverResult<ConfigResult> {
        let probe = self.probe_diff(device_path, method, format).await?;

        if probe.trim().is_empty() {
            debug!(device = %self.name, "No configuration changes detected");
            return Ok(ConfigResult::no_changes(&self.name));
        }

        let committed = self.apply(device_path, method, format, comment).await?;
        debug!(device = %self.name, "Configuration committed");
        let diff = if committed.trim().is_empty() { probe } else { committed };
        Ok(ConfigResult::applied(
            &self.name,
            "Configuration committed",
            diff,
        ))
    }
}

#[async_trait]
impl NodeDriver for JuniperDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    async fn connect(&mut self) -> DriverResult<()> {
        if self.transport.is_some() {
            return Ok(());
        }

        #[cfg(feature = "russh")]
        {
            let transport = crate::connection::SshTransport::connect(
                &self.params.host,
                self.params.port,
                &self.params.username,
                self.params.password.as_deref(),
                self.params.key_file.as_deref(),
                Duration::from_secs(self.params.timeout),
            )
            .await?;
            debug!(device = %self.name, "Connected");
            self.transport = Some(Arc::new(transport));
            Ok(())
        }

        #[cfg(not(feature = "russh"))]
        {
            Err(DriverError::InvalidConfig(
                "No transport backend compiled in (enable the 'russh' feature)".to_string(),
            ))
        }
    }

    async fn disconnect(&mut self) {
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                warn!(device = %self.name, error = %e, "Error closing transport");
            }
            debug!(device = %self.name, "Disconnected");
        }
    }

    async fn execute_command(
        &mut self,
        command: &str,
        timeout: Option<u64>,
    ) -> DriverResult<CommandResult> {
        let started = Instant::now();
        let output = self.run_operational(command, timeout).await?;
        let duration = started.elapsed().as_secs_f64();

        if output.success {
            Ok(CommandResult::success(
                &self.name,
                command,
                output.stdout,
                duration,
            ))
        } else {
            Ok(CommandResult::failure(
                &self.name,
                command,
                output.combined_output(),
                output.exit_code,
                duration,
            ))
        }
    }

    async fn load_config(
        &mut self,
        content: &str,
        format: ConfigFormat,
        method: ConfigLoadMethod,
        comment: Option<&str>,
    ) -> DriverResult<ConfigResult> {
        self.stage_config(content).await?;
        let result = self
            .load_and_commit(CONFIG_TEMP_FILE, method, format, comment)
            .await;
        self.cleanup_staged().await;
        result
    }

    async fn load_config_from_file(
        &mut self,
        device_path: &str,
        method: ConfigLoadMethod,
        comment: Option<&str>,
    ) -> DriverResult<ConfigResult> {
        // Format is inferred by the device from the file content
        self.load_and_commit(device_path, method, ConfigFormat::Text, comment)
            .await
    }

    async fn validate_config(
        &mut self,
        content: &str,
        format: ConfigFormat,
    ) -> DriverResult<(bool, Option<String>)> {
        self.stage_config(content).await?;

        let load = load_command(ConfigLoadMethod::Merge, format, CONFIG_TEMP_FILE);
        let result = self
            .run_config(&[&load, "commit check", "rollback 0"])
            .await;
        self.cleanup_staged().await;

        let output = result?;
        if output.success || output.stdout.contains("configuration check succeeds") {
            Ok((true, None))
        } else {
            Ok((false, Some(output.combined_output())))
        }
    }

    async fn get_config_diff(&mut self) -> DriverResult<Option<String>> {
        let output = self.run_config(&["show | compare"]).await?;
        let diff = extract_diff(&output.stdout);
        if diff.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(diff))
        }
    }

    async fn commit_config(
        &mut self,
        comment: Option<&str>,
        confirmed: bool,
        timeout_minutes: u64,
    ) -> DriverResult<ConfigResult> {
        let commit = commit_command(comment, confirmed, timeout_minutes);
        let output = self.run_config(&[&commit]).await?;

        if output.success || output.stdout.contains("commit complete") {
            let message = if confirmed && timeout_minutes > 0 {
                format!(
                    "Committed with {} minute confirm timeout",
                    timeout_minutes
                )
            } else {
                "Committed configuration".to_string()
            };
            Ok(ConfigResult::succeeded(&self.name, message))
        } else {
            Err(DriverError::CommitFailed(format!(
                "Commit failed on {}: {}",
                self.name,
                output.combined_output()
            )))
        }
    }

    async fn rollback_config(&mut self, rollback_id: Option<u32>) -> DriverResult<ConfigResult> {
        // rollback 1 restores the state before the most recent commit
        let id = rollback_id.unwrap_or(1);
        let rollback = format!("rollback {}", id);
        let output = self.run_config(&[&rollback, "commit"]).await?;

        if output.success || output.stdout.contains("commit complete") {
            Ok(
                ConfigResult::succeeded(&self.name, format!("Rolled back to {}", id))
                    .with_rollback_id(id),
            )
        } else {
            Err(DriverError::RollbackFailed(format!(
                "Rollback failed on {}: {}",
                self.name,
                output.combined_output()
            )))
        }
    }

    async fn get_facts(&mut self) -> DriverResult<HashMap<String, String>> {
        let mut facts = HashMap::new();
        facts.insert("vendor".to_string(), "juniper".to_string());

        let version = self.run_operational("show version", None).await?;
        parse_show_version(&version.stdout, &mut facts);

        let uptime = self.run_operational("show system uptime", None).await?;
        if let Some(value) = parse_uptime(&uptime.stdout) {
            facts.insert("uptime".to_string(), value);
        }

        let hardware = self.run_operational("show chassis hardware", None).await?;
        if let Some(serial) = parse_chassis_serial(&hardware.stdout) {
            facts.insert("serial".to_string(), serial);
        }

        Ok(facts)
    }
}

/// Strip CLI echo and prompts, keeping only diff lines
fn extract_diff(output: &str) -> String {
    output
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("load complete")
                && !trimmed.starts_with("Entering configuration mode")
                && !trimmed.starts_with("Exiting configuration mode")
                && !trimmed.starts_with("load operation")
                && !trimmed.starts_with("commit complete")
                && !trimmed.starts_with("commit confirmed")
                && !trimmed.starts_with("configuration check succeeds")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse `show version` output into hostname / model / version facts
fn parse_show_version(output: &str, facts: &mut HashMap<String, String>) {
    for line in output.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Hostname:") {
            facts.insert("hostname".to_string(), value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Model:") {
            facts.insert("model".to_string(), value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Junos:") {
            facts.insert("version".to_string(), value.trim().to_string());
        }
    }
}

/// Pull the "up ..." portion out of `show system uptime` output
fn parse_uptime(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains(" up "))
        .and_then(|line| line.split(" up ").nth(1))
        .map(|rest| rest.trim_end_matches(',').trim().to_string())
}

/// Serial number from the Chassis line of `show chassis hardware`
fn parse_chassis_serial(output: &str) -> Option<String> {
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() == Some("Chassis") {
            // Chassis <serial> <description...>
            return fields.next().map(str::to_string);
        }
    }
    None
}

/// Factory registering the JunOS driver for Juniper vendors and kinds.
pub struct JuniperDriverFactory;

impl DriverFactory for JuniperDriverFactory {
    fn name(&self) -> &str {
        "juniper"
    }

    fn supported_vendors(&self) -> Vec<&str> {
        vec!["juniper"]
    }

    fn supported_device_types(&self) -> Vec<&str> {
        DEVICE_TYPES.to_vec()
    }

    fn create(&self, params: ConnectionParams) -> DriverResult<Box<dyn NodeDriver>> {
        if params.host.is_empty() {
            return Err(DriverError::InvalidConfig(
                "Device host must not be empty".to_string(),
            ));
        }
        Ok(Box::new(JuniperDriver::new(params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionResult, Transport};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport fake that records issued commands and replays scripted
    /// outputs in order; unscripted commands succeed with empty output.
    struct ScriptedTransport {
        calls: Mutex<Vec<String>>,
        responses: Mutex<VecDeque<CommandOutput>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<CommandOutput>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        fn identifier(&self) -> &str {
            "test@r1:22"
        }

        async fn is_alive(&self) -> bool {
            true
        }

        async fn execute(
            &self,
            command: &str,
            _timeout: Option<u64>,
        ) -> ConnectionResult<CommandOutput> {
            self.calls.lock().unwrap().push(command.to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| CommandOutput::success(String::new(), String::new())))
        }

        async fn close(&self) -> ConnectionResult<()> {
            Ok(())
        }
    }

    fn driver_with(responses: Vec<CommandOutput>) -> (JuniperDriver, Arc<ScriptedTransport>) {
        let transport = ScriptedTransport::new(responses);
        let params = ConnectionParams::new("r1", "admin").with_vendor("juniper");
        let driver = JuniperDriver::with_transport(params, transport.clone());
        (driver, transport)
    }

    #[tokio::test]
    async fn test_execute_command_wraps_in_cli() {
        let (mut driver, transport) = driver_with(vec![CommandOutput::success(
            "Junos: 23.2R1".to_string(),
            String::new(),
        )]);

        let result = driver.execute_command("show version", None).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.output, "Junos: 23.2R1");
        assert_eq!(transport.calls()[0], "cli -c 'show version'");
    }

    #[tokio::test]
    async fn test_load_config_with_changes_commits() {
        // stage, probe (diff), apply, cleanup
        let (mut driver, transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            CommandOutput::success(
                "[edit system]\n+  host-name r1;".to_string(),
                String::new(),
            ),
            CommandOutput::success("commit complete".to_string(), String::new()),
        ]);

        let result = driver
            .load_config(
                "set system host-name r1",
                ConfigFormat::Set,
                ConfigLoadMethod::Merge,
                Some("initial"),
            )
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.diff.as_deref().unwrap().contains("host-name r1"));

        let calls = transport.calls();
        assert!(calls[0].starts_with("echo "));
        assert!(calls[1].contains("load merge set"));
        assert!(calls[1].contains("show | compare"));
        assert!(calls[1].contains("rollback 0"));
        assert!(calls[2].contains("show | compare"));
        assert!(calls[2].contains(r#"commit comment "initial""#));
        assert!(calls[3].starts_with("rm -f"));
    }

    #[tokio::test]
    async fn test_commit_session_reverifies_diff_under_its_own_lock() {
        // the candidate is discarded between the probe and commit scripts,
        // so the commit script re-runs the comparison and its diff wins
        let (mut driver, transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            CommandOutput::success(
                "[edit system]\n+  host-name r1;".to_string(),
                String::new(),
            ),
            CommandOutput::success(
                "[edit system]\n+  host-name r1;\n+  domain-name lab;\ncommit complete"
                    .to_string(),
                String::new(),
            ),
        ]);

        let result = driver
            .load_config(
                "set system host-name r1",
                ConfigFormat::Set,
                ConfigLoadMethod::Merge,
                None,
            )
            .await
            .unwrap();

        // the reported diff is the one computed in the commit session
        let diff = result.diff.as_deref().unwrap();
        assert!(diff.contains("domain-name lab"));
        assert!(!diff.contains("commit complete"));

        let calls = transport.calls();
        assert!(calls[2].starts_with("cli -c 'configure exclusive"));
        assert!(calls[2].contains("show | compare"));
        assert!(calls[2].ends_with("; exit'"));
    }

    #[tokio::test]
    async fn test_load_config_no_changes_never_commits() {
        let (mut driver, transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            // empty diff from the probe
            CommandOutput::success("load complete".to_string(), String::new()),
        ]);

        let result = driver
            .load_config(
                "set system host-name r1",
                ConfigFormat::Set,
                ConfigLoadMethod::Merge,
                None,
            )
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.diff.is_none());

        // no issued script carries a standalone commit
        for call in transport.calls() {
            assert!(!call.contains("; commit;") && !call.contains("; commit'"));
        }
    }

    #[tokio::test]
    async fn test_config_scripts_take_and_release_lock() {
        let (mut driver, transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            CommandOutput::success("+ change".to_string(), String::new()),
            CommandOutput::success("commit complete".to_string(), String::new()),
        ]);

        driver
            .load_config("x", ConfigFormat::Text, ConfigLoadMethod::Merge, None)
            .await
            .unwrap();

        for call in transport.calls() {
            if call.starts_with("cli -c 'configure exclusive") {
                assert_eq!(call.matches("configure exclusive").count(), 1);
                assert!(call.ends_with("; exit'"));
            }
        }
    }

    #[tokio::test]
    async fn test_validate_config_always_rolls_back() {
        let (mut driver, transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            CommandOutput::success("configuration check succeeds".to_string(), String::new()),
        ]);

        let (valid, detail) = driver
            .validate_config("set system host-name r1", ConfigFormat::Set)
            .await
            .unwrap();

        assert!(valid);
        assert!(detail.is_none());

        let script = &transport.calls()[1];
        assert!(script.contains("commit check"));
        assert!(script.contains("rollback 0"));
        assert_eq!(script.matches("rollback 0").count(), 1);
    }

    #[tokio::test]
    async fn test_validate_config_reports_failure_detail() {
        let (mut driver, _transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            CommandOutput::failure(1, String::new(), "syntax error".to_string()),
        ]);

        let (valid, detail) = driver
            .validate_config("bogus", ConfigFormat::Text)
            .await
            .unwrap();

        assert!(!valid);
        assert!(detail.unwrap().contains("syntax error"));
    }

    #[tokio::test]
    async fn test_rollback_defaults_to_previous_commit() {
        let (mut driver, transport) = driver_with(vec![CommandOutput::success(
            "commit complete".to_string(),
            String::new(),
        )]);

        let result = driver.rollback_config(None).await.unwrap();
        assert!(result.success);
        assert!(result.diff.is_none());
        assert_eq!(result.rollback_id, Some(1));
        assert!(transport.calls()[0].contains("rollback 1; commit"));
    }

    #[tokio::test]
    async fn test_commit_confirmed_passes_timeout() {
        let (mut driver, transport) = driver_with(vec![CommandOutput::success(
            "commit complete".to_string(),
            String::new(),
        )]);

        let result = driver.commit_config(None, true, 5).await.unwrap();
        assert!(result.success);
        assert!(result.diff.is_none());
        assert!(result.message.contains("5 minute"));
        assert!(transport.calls()[0].contains("commit confirmed 5"));
    }

    #[tokio::test]
    async fn test_not_connected_error() {
        let params = ConnectionParams::new("r1", "admin");
        let mut driver = JuniperDriver::new(params);
        let err = driver.execute_command("show version", None).await.unwrap_err();
        assert!(matches!(err, DriverError::NotConnected(_)));
    }

    #[tokio::test]
    async fn test_lock_contention_maps_to_lock_failed() {
        let (mut driver, _transport) = driver_with(vec![
            CommandOutput::success(String::new(), String::new()),
            CommandOutput::failure(
                1,
                String::new(),
                "error: configuration database locked by: other@r1".to_string(),
            ),
        ]);

        let err = driver
            .load_config("x", ConfigFormat::Text, ConfigLoadMethod::Merge, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::LockFailed(_)));
    }

    #[tokio::test]
    async fn test_get_facts_parses_device_output() {
        let (mut driver, _transport) = driver_with(vec![
            CommandOutput::success(
                "Hostname: r1\nModel: vmx\nJunos: 23.2R1.13".to_string(),
                String::new(),
            ),
            CommandOutput::success(
                "12:00PM  up 2 days, 3:45, 1 user".to_string(),
                String::new(),
            ),
            CommandOutput::success(
                "Hardware inventory:\nChassis                                VM1234567890      VMX".to_string(),
                String::new(),
            ),
        ]);

        let facts = driver.get_facts().await.unwrap();
        assert_eq!(facts.get("hostname").map(String::as_str), Some("r1"));
        assert_eq!(facts.get("model").map(String::as_str), Some("vmx"));
        assert_eq!(facts.get("version").map(String::as_str), Some("23.2R1.13"));
        assert_eq!(facts.get("vendor").map(String::as_str), Some("juniper"));
        assert_eq!(
            facts.get("serial").map(String::as_str),
            Some("VM1234567890")
        );
        assert!(facts.get("uptime").unwrap().contains("2 days"));
    }

    #[test]
    fn test_shell_escape_single_quotes() {
        assert_eq!(shell_escape("it's"), r"it'\''s");
    }

    #[test]
    fn test_load_command_text_has_no_format_keyword() {
        assert_eq!(
            load_command(ConfigLoadMethod::Override, ConfigFormat::Text, "/tmp/f"),
            "load override /tmp/f"
        );
        assert_eq!(
            load_command(ConfigLoadMethod::Replace, ConfigFormat::Json, "/tmp/f"),
            "load replace json /tmp/f"
        );
    }
}
