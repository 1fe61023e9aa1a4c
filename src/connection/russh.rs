//! SSH transport built on the russh crate.
//!
//! Russh is a modern, async-native SSH library that integrates directly
//! with Tokio. Each command executes on its own channel over a single
//! authenticated session.

use async_trait::async_trait;
use russh::client::{Handle, Handler};
use russh::keys::key::PublicKey;
use russh::keys::load_secret_key;
use russh::ChannelMsg;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use super::{CommandOutput, ConnectionError, ConnectionResult, Transport};

/// Russh-related error type - wraps russh::Error for compatibility with the Handler trait
#[derive(Debug)]
pub struct RusshError(pub ::russh::Error);

impl From<::russh::Error> for RusshError {
    fn from(err: ::russh::Error) -> Self {
        RusshError(err)
    }
}

impl std::fmt::Display for RusshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Russh error: {}", self.0)
    }
}

impl std::error::Error for RusshError {}

impl From<::russh::Error> for ConnectionError {
    fn from(err: ::russh::Error) -> Self {
        ConnectionError::SshError(format!("Russh error: {}", err))
    }
}

/// Client handler accepting server keys accept-new style.
///
/// Lab devices are rebuilt constantly, so strict known_hosts pinning is
/// more hindrance than protection here; the accepted key is logged so an
/// operator can still audit it.
struct ClientHandler {
    host: String,
}

impl ClientHandler {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
        }
    }
}

#[async_trait]
impl Handler for ClientHandler {
    type Error = RusshError;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            host = %self.host,
            fingerprint = %server_public_key.fingerprint(),
            "Accepting server host key"
        );
        Ok(true)
    }
}

/// Default identity files tried when no explicit key is configured
fn default_identity_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        let ssh_dir = home.join(".ssh");
        for name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
            paths.push(ssh_dir.join(name));
        }
    }
    paths.retain(|p| p.exists());
    paths
}

/// SSH transport session to one device.
///
/// The handle uses RwLock so concurrent command executions only need read
/// access to open channels; close() takes write access to drop the handle.
pub struct SshTransport {
    /// Session identifier (user@host:port)
    identifier: String,
    /// Russh client handle
    handle: Arc<RwLock<Option<Handle<ClientHandler>>>>,
    /// Whether the session is established
    connected: Arc<AtomicBool>,
}

impl SshTransport {
    /// Connect and authenticate to a device via SSH.
    pub async fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: Option<&str>,
        key_file: Option<&Path>,
        timeout: Duration,
    ) -> ConnectionResult<Self> {
        let identifier = format!("{}@{}:{}", user, host, port);
        debug!(host = %host, port = %port, user = %user, "Connecting via SSH (russh)");

        let mut config = russh::client::Config::default();
        config.inactivity_timeout = Some(timeout);
        let config = Arc::new(config);

        let addr = format!("{}:{}", host, port);
        let socket = tokio::time::timeout(timeout, tokio::net::TcpStream::connect(&addr))
            .await
            .map_err(|_| ConnectionError::Timeout(timeout.as_secs()))?
            .map_err(|e| {
                ConnectionError::ConnectionFailed(format!("Failed to connect to {}: {}", addr, e))
            })?;

        // Disable Nagle for lower command latency
        socket.set_nodelay(true).map_err(|e| {
            ConnectionError::ConnectionFailed(format!("Failed to set TCP_NODELAY: {}", e))
        })?;

        let handler = ClientHandler::new(host);
        let mut session = russh::client::connect_stream(config, socket, handler)
            .await
            .map_err(|e| {
                ConnectionError::ConnectionFailed(format!("SSH handshake failed: {}", e))
            })?;

        Self::authenticate(&mut session, user, password, key_file).await?;

        debug!(identifier = %identifier, "SSH session established");
        Ok(Self {
            identifier,
            handle: Arc::new(RwLock::new(Some(session))),
            connected: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Perform SSH authentication: explicit key, default keys, then password
    async fn authenticate(
        session: &mut Handle<ClientHandler>,
        user: &str,
        password: Option<&str>,
        key_file: Option<&Path>,
    ) -> ConnectionResult<()> {
        if let Some(key_path) = key_file {
            if Self::try_key_auth(session, user, key_path, password)
                .await
                .is_ok()
            {
                debug!(key = %key_path.display(), "Authenticated using key");
                return Ok(());
            }
        }

        for key_path in default_identity_files() {
            if Self::try_key_auth(session, user, &key_path, password)
                .await
                .is_ok()
            {
                debug!(key = %key_path.display(), "Authenticated using key");
                return Ok(());
            }
        }

        if let Some(password) = password {
            let authenticated = session
                .authenticate_password(user, password)
                .await
                .map_err(|e| {
                    ConnectionError::AuthenticationFailed(format!(
                        "Password authentication failed: {}",
                        e
                    ))
                })?;

            if authenticated {
                debug!("Authenticated using password");
                return Ok(());
            }
        }

        Err(ConnectionError::AuthenticationFailed(
            "All authentication methods failed".to_string(),
        ))
    }

    /// Try key-based authentication, with the password as a passphrase fallback
    async fn try_key_auth(
        session: &mut Handle<ClientHandler>,
        user: &str,
        key_path: &Path,
        passphrase: Option<&str>,
    ) -> ConnectionResult<()> {
        let key_pair = match load_secret_key(key_path, None) {
            Ok(key) => key,
            Err(_) => {
                let pass = passphrase.ok_or_else(|| {
                    ConnectionError::AuthenticationFailed(format!(
                        "Failed to load key {}",
                        key_path.display()
                    ))
                })?;
                load_secret_key(key_path, Some(pass)).map_err(|e| {
                    ConnectionError::AuthenticationFailed(format!(
                        "Failed to load key {}: {}",
                        key_path.display(),
                        e
                    ))
                })?
            }
        };

        let authenticated = session
            .authenticate_publickey(user, Arc::new(key_pair))
            .await
            .map_err(|e| {
                ConnectionError::AuthenticationFailed(format!("Key authentication failed: {}", e))
            })?;

        if authenticated {
            Ok(())
        } else {
            Err(ConnectionError::AuthenticationFailed(
                "Key authentication failed".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Transport for SshTransport {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn is_alive(&self) -> bool {
        if !self.connected.load(Ordering::SeqCst) {
            return false;
        }
        self.handle.read().await.is_some()
    }

    async fn execute(
        &self,
        command: &str,
        timeout: Option<u64>,
    ) -> ConnectionResult<CommandOutput> {
        trace!(command = %command, "Executing remote command");

        let execute_future = async {
            let handle_guard = self.handle.read().await;
            let handle: &Handle<ClientHandler> = handle_guard
                .as_ref()
                .ok_or(ConnectionError::ConnectionClosed)?;

            let mut channel = handle.channel_open_session().await.map_err(|e| {
                ConnectionError::ExecutionFailed(format!("Failed to open channel: {}", e))
            })?;
            drop(handle_guard);

            channel.exec(true, command).await.map_err(|e| {
                ConnectionError::ExecutionFailed(format!("Failed to execute command: {}", e))
            })?;

            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            let mut exit_code = None;

            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { ref data } => {
                        stdout.extend_from_slice(data);
                    }
                    ChannelMsg::ExtendedData { ref data, ext } => {
                        // Extended data type 1 is stderr
                        if ext == 1 {
                            stderr.extend_from_slice(data);
                        }
                    }
                    ChannelMsg::ExitStatus { exit_status } => {
                        exit_code = Some(exit_status);
                    }
                    ChannelMsg::Close => {
                        break;
                    }
                    _ => {}
                }
            }

            let _ = channel.eof().await;

            // Missing exit status means the channel died before the command finished
            let exit_code: i32 = exit_code.map(|e| e as i32).unwrap_or(i32::MAX);
            let stdout_str = String::from_utf8_lossy(&stdout).to_string();
            let stderr_str = String::from_utf8_lossy(&stderr).to_string();

            trace!(exit_code = %exit_code, "Command completed");

            if exit_code == 0 {
                Ok(CommandOutput::success(stdout_str, stderr_str))
            } else {
                Ok(CommandOutput::failure(exit_code, stdout_str, stderr_str))
            }
        };

        if let Some(timeout_secs) = timeout {
            match tokio::time::timeout(Duration::from_secs(timeout_secs), execute_future).await {
                Ok(result) => result,
                Err(_) => Err(ConnectionError::Timeout(timeout_secs)),
            }
        } else {
            execute_future.await
        }
    }

    async fn close(&self) -> ConnectionResult<()> {
        self.connected.store(false, Ordering::SeqCst);

        let handle = self.handle.write().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle
                .disconnect(russh::Disconnect::ByApplication, "", "en")
                .await
            {
                warn!(identifier = %self.identifier, error = %e, "Error during SSH disconnect");
            }
        }
        Ok(())
    }
}
