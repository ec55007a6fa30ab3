//! Unix socket IPC for a running service
//!
//! A second `macruntu` invocation forwards its macro to the running service
//! instead of applying it itself. One request line, one response line:
//!
//! - `apply <ref>` → `ok` | `ok secret` | `skipped` | `error: ...`
//! - `status` → `ready`
//! - `quit` | `exit` | `shutdown` → `bye`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use macruntu_paste::CommandRunner;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::applier::{ApplyError, ApplyStatus, MacroApplier};
use crate::macro_ref::parse_reference;

/// IPC command
#[derive(Debug, PartialEq, Eq)]
pub enum IpcCommand {
    Apply(usize),
    Status,
    Quit,
}

impl IpcCommand {
    pub fn parse(s: &str) -> Result<Self> {
        let line = s.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match verb.to_lowercase().as_str() {
            "apply" => parse_reference(rest)
                .map(Self::Apply)
                .with_context(|| format!("Invalid macro reference: {:?}", rest.trim())),
            "status" => Ok(Self::Status),
            "quit" | "exit" | "shutdown" => Ok(Self::Quit),
            _ => anyhow::bail!("Unknown command: {}", line),
        }
    }
}

/// Unix socket IPC server
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Bind the socket, replacing a stale one.
    ///
    /// Fails if another service is already answering on it.
    pub async fn bind(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            if UnixStream::connect(socket_path).await.is_ok() {
                anyhow::bail!(
                    "Another instance is already listening on {}",
                    socket_path.display()
                );
            }
            std::fs::remove_file(socket_path).context("Failed to remove stale socket")?;
        }

        if let Some(parent) = socket_path.parent() {
            macruntu_paths::ensure_private_dir(parent)?;
        }

        let listener = UnixListener::bind(socket_path).context("Failed to bind Unix socket")?;
        macruntu_paths::secure_socket_permissions(socket_path)?;

        info!("IPC server listening on {}", socket_path.display());

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Serve connections until a quit command arrives
    pub async fn run<R>(&self, applier: Arc<MacroApplier<R>>) -> Result<()>
    where
        R: CommandRunner + Send + Sync + 'static,
    {
        let shutdown = Arc::new(Notify::new());

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, _) = accepted.context("Failed to accept connection")?;
                    let applier = Arc::clone(&applier);
                    let shutdown = Arc::clone(&shutdown);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, applier, shutdown).await {
                            warn!("IPC connection error: {}", e);
                        }
                    });
                }
                _ = shutdown.notified() => {
                    info!("Received quit command");
                    return Ok(());
                }
            }
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Handle a single IPC connection
pub async fn handle_connection<R>(
    stream: UnixStream,
    applier: Arc<MacroApplier<R>>,
    shutdown: Arc<Notify>,
) -> Result<()>
where
    R: CommandRunner + Send + Sync + 'static,
{
    let (reader, mut writer) = stream.into_split();
    let mut request = String::new();
    if BufReader::new(reader).read_line(&mut request).await? == 0 {
        return Ok(());
    }
    debug!("Received IPC command: {}", request.trim());

    let response = match IpcCommand::parse(&request) {
        Ok(IpcCommand::Apply(index)) => match applier.apply_index(index) {
            // Delayed pastes keep running after the reply
            Ok(report) => report.status.message().to_string(),
            Err(e @ ApplyError::NoSuchMacro { .. }) => {
                warn!("{}", e);
                ApplyStatus::Skipped.message().to_string()
            }
            Err(e) => format!("error: {}", e),
        },
        Ok(IpcCommand::Status) => "ready".to_string(),
        Ok(IpcCommand::Quit) => {
            shutdown.notify_one();
            "bye".to_string()
        }
        Err(e) => format!("error: {}", e),
    };

    writer.write_all(response.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    Ok(())
}

/// Send one command to a running service and return its reply
pub async fn send_command(socket_path: &Path, command: &str) -> Result<String> {
    let mut stream = UnixStream::connect(socket_path)
        .await
        .with_context(|| format!("No service listening on {}", socket_path.display()))?;

    stream.write_all(command.trim().as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.shutdown().await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response.trim().to_string())
}
