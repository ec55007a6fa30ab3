//! Platform path utilities for Macruntu.
//!
//! Single source of truth for where the config file and the IPC socket live.
//!
//! # Platform Behavior
//!
//! | Platform | Config Directory | Socket Directory |
//! |----------|------------------|------------------|
//! | Linux    | `~/.config/macruntu` | `$XDG_RUNTIME_DIR` or `~/.local/share/macruntu` |
//! | macOS    | `~/Library/Application Support/macruntu` | Data dir |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors specific to path operations.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine config directory")]
    NoConfigDirectory,

    #[error("Could not determine data directory")]
    NoDataDirectory,
}

/// Application identifier used in path construction.
const APP_NAME: &str = "macruntu";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Socket file name for IPC communication.
const IPC_SOCKET_NAME: &str = "macruntu.sock";

/// Config directory path, without touching the filesystem.
pub fn config_dir_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(PathError::NoConfigDirectory)?;
    Ok(base.join(APP_NAME))
}

/// Default path of the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir_path()?.join(CONFIG_FILE_NAME))
}

/// Get the application data directory, creating it if needed.
///
/// - **Linux**: `~/.local/share/macruntu`
/// - **macOS**: `~/Library/Application Support/macruntu`
pub fn get_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or(PathError::NoDataDirectory)?;
    let data_dir = base.join(APP_NAME);
    ensure_private_dir(&data_dir)?;
    Ok(data_dir)
}

/// Get the socket directory for the IPC socket.
///
/// Prefers `XDG_RUNTIME_DIR` (user-specific, auto-cleaned) and falls back to
/// the data directory.
pub fn get_socket_dir() -> Result<PathBuf> {
    if let Some(runtime_dir) = dirs::runtime_dir() {
        if runtime_dir.exists() {
            return Ok(runtime_dir);
        }
    }
    get_data_dir()
}

/// Get the path to the IPC socket.
pub fn get_ipc_socket_path() -> Result<PathBuf> {
    Ok(get_socket_dir()?.join(IPC_SOCKET_NAME))
}

/// Create `dir` if missing and restrict it to the owner.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(dir, perms)
            .with_context(|| format!("Failed to set permissions on {}", dir.display()))?;
    }

    Ok(())
}

/// Set secure Unix socket permissions (0o600, owner read/write only).
#[cfg(unix)]
pub fn secure_socket_permissions(socket_path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if socket_path.exists() {
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(socket_path, perms).with_context(|| {
            format!(
                "Failed to set socket permissions: {}",
                socket_path.display()
            )
        })?;
    }

    Ok(())
}

#[cfg(not(unix))]
pub fn secure_socket_permissions(_socket_path: &Path) -> Result<()> {
    Ok(())
}
