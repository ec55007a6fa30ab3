//! Input-synthesis backends and their availability on this host
//!
//! Tool compatibility:
//! - xdotool: X11 only, takes symbolic combos ("ctrl+v")
//! - wtype: Wayland compositors with the virtual-keyboard protocol
//! - ydotool: everywhere via kernel uinput, raw keycodes only

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// External tool used to synthesize the paste keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Xdotool,
    Wtype,
    Ydotool,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Xdotool, Backend::Wtype, Backend::Ydotool];

    /// Command name looked up on PATH
    pub fn command(&self) -> &'static str {
        match self {
            Self::Xdotool => "xdotool",
            Self::Wtype => "wtype",
            Self::Ydotool => "ydotool",
        }
    }

    /// Parse a configured backend name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|backend| backend.command().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Deserialize an optional backend name, treating unknown names as unset.
///
/// An unrecognized `paste_backend` must not make the whole config unreadable;
/// the dispatcher simply falls back to session detection.
pub fn deserialize_lenient_backend<'de, D>(deserializer: D) -> Result<Option<Backend>, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.and_then(|name| {
        let backend = Backend::from_name(&name);
        if backend.is_none() {
            warn!("Ignoring unknown paste_backend {:?}", name);
        }
        backend
    }))
}

/// Which backends are installed, resolved once at startup
///
/// Never re-probed: a tool installed while the process runs is picked up on
/// the next start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackendSet {
    pub xdotool: Option<PathBuf>,
    pub wtype: Option<PathBuf>,
    pub ydotool: Option<PathBuf>,
}

impl BackendSet {
    /// Probe PATH for all three tools
    pub fn probe() -> Self {
        let set = Self::probe_with(resolve_tool);
        debug!("Available backends: {:?}", set.available().collect::<Vec<_>>());
        set
    }

    /// Probe with a custom resolver (tests, alternate search paths)
    pub fn probe_with<F>(mut resolve: F) -> Self
    where
        F: FnMut(&str) -> Option<PathBuf>,
    {
        Self {
            xdotool: resolve(Backend::Xdotool.command()),
            wtype: resolve(Backend::Wtype.command()),
            ydotool: resolve(Backend::Ydotool.command()),
        }
    }

    /// Resolved path of a backend, if installed
    pub fn get(&self, backend: Backend) -> Option<&Path> {
        match backend {
            Backend::Xdotool => self.xdotool.as_deref(),
            Backend::Wtype => self.wtype.as_deref(),
            Backend::Ydotool => self.ydotool.as_deref(),
        }
    }

    pub fn is_available(&self, backend: Backend) -> bool {
        self.get(backend).is_some()
    }

    /// Installed backends in probe order
    pub fn available(&self) -> impl Iterator<Item = Backend> + '_ {
        Backend::ALL
            .into_iter()
            .filter(move |backend| self.is_available(*backend))
    }

    /// Set with the given backends "installed" under their bare names
    pub fn with_available(backends: &[Backend]) -> Self {
        Self::probe_with(|name| {
            backends
                .iter()
                .find(|backend| backend.command() == name)
                .map(|backend| PathBuf::from(backend.command()))
        })
    }
}

/// Resolve a command name to its full path using `which`
pub fn resolve_tool(name: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(name).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout.lines().next()?.trim();
    if path.is_empty() {
        None
    } else {
        debug!("Resolved {} to {}", name, path);
        Some(PathBuf::from(path))
    }
}
