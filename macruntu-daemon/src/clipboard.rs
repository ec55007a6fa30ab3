//! Clipboard writers
//!
//! On Wayland the clipboard is owned by whichever client set it last, so the
//! `wl-copy` helper (which forks and keeps serving the selection) is preferred.
//! Elsewhere arboard is used and kept alive for the lifetime of the writer.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

/// Clipboard write errors
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Failed to run {}: {source}", tool.display())]
    Io {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}", tool.display())]
    ToolFailed { tool: PathBuf, status: ExitStatus },

    #[error("Clipboard error: {0}")]
    Arboard(#[from] arboard::Error),

    #[error("Clipboard lock poisoned")]
    Poisoned,
}

/// Write-only clipboard access
pub trait ClipboardBackend: Send + Sync {
    /// Put `text` on the clipboard (and the primary selection where one exists)
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Wayland clipboard through the `wl-copy` tool
pub struct WlCopyClipboard {
    tool: PathBuf,
}

impl WlCopyClipboard {
    pub fn new<P: Into<PathBuf>>(tool: P) -> Self {
        Self { tool: tool.into() }
    }

    /// Use `wl-copy` if it is on PATH
    pub fn detect() -> Option<Self> {
        macruntu_paste::resolve_tool("wl-copy").map(Self::new)
    }

    fn copy(&self, text: &str, primary: bool) -> Result<(), ClipboardError> {
        let io_err = |source: std::io::Error| ClipboardError::Io {
            tool: self.tool.clone(),
            source,
        };

        let mut command = Command::new(&self.tool);
        if primary {
            command.arg("--primary");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(io_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(io_err)?;
        }

        let status = child.wait().map_err(io_err)?;
        if !status.success() {
            return Err(ClipboardError::ToolFailed {
                tool: self.tool.clone(),
                status,
            });
        }
        Ok(())
    }
}

impl ClipboardBackend for WlCopyClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        // Terminals paste from PRIMARY on middle click
        self.copy(text, false)?;
        self.copy(text, true)
    }

    fn name(&self) -> &'static str {
        "wl-copy"
    }
}

/// Cross-platform clipboard through arboard
pub struct ArboardClipboard {
    clipboard: Mutex<arboard::Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            clipboard: Mutex::new(arboard::Clipboard::new()?),
        })
    }
}

impl ClipboardBackend for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = self.clipboard.lock().map_err(|_| ClipboardError::Poisoned)?;
        clipboard.set_text(text)?;

        #[cfg(target_os = "linux")]
        {
            use arboard::{LinuxClipboardKind, SetExtLinux};
            if let Err(e) = clipboard
                .set()
                .clipboard(LinuxClipboardKind::Primary)
                .text(text)
            {
                debug!("Primary selection not set: {}", e);
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "arboard"
    }
}

/// Best clipboard writer for this host
pub fn default_clipboard() -> Result<Box<dyn ClipboardBackend>, ClipboardError> {
    if let Some(wl_copy) = WlCopyClipboard::detect() {
        debug!("Using wl-copy clipboard");
        return Ok(Box::new(wl_copy));
    }
    debug!("wl-copy not found, using arboard clipboard");
    Ok(Box::new(ArboardClipboard::new()?))
}
