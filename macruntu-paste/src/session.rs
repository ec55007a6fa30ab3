//! Desktop session detection
//!
//! The dispatcher only needs to know whether the session is X11 (xdotool
//! works) or something else. `XDG_SESSION_TYPE` is authoritative when set;
//! otherwise evidence from `WAYLAND_DISPLAY` and `DISPLAY` is scored.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Environment variable access, so detection can run against a mock
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// Environment provider backed by `std::env::var`
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Display server family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayServer {
    X11,
    Wayland,
    Unknown,
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X11 => "x11",
            Self::Wayland => "wayland",
            Self::Unknown => "unknown",
        })
    }
}

/// What the current session looks like
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// Lowercased session type handed to the dispatcher ("x11", "wayland", "tty", "")
    pub session_type: String,
    /// Scored display server
    pub display_server: DisplayServer,
    /// Desktop environment (e.g., "GNOME", "KDE", "sway")
    pub desktop_environment: Option<String>,
}

/// Detect the current session from the process environment
pub fn detect_session() -> SessionInfo {
    detect_session_with_env(&SystemEnv)
}

/// Detection against an arbitrary environment provider
pub fn detect_session_with_env(env: &dyn EnvProvider) -> SessionInfo {
    let session_type = env.get("XDG_SESSION_TYPE");
    let desktop = env.get("XDG_CURRENT_DESKTOP");
    let wayland_display = env.get("WAYLAND_DISPLAY");
    let x11_display = env.get("DISPLAY");

    debug!("XDG_SESSION_TYPE: {:?}", session_type);
    debug!("XDG_CURRENT_DESKTOP: {:?}", desktop);
    debug!("WAYLAND_DISPLAY: {:?}", wayland_display);
    debug!("DISPLAY: {:?}", x11_display);

    let session_type = session_type
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty());

    let mut x11_score = 0;
    let mut wayland_score = 0;

    match session_type.as_deref() {
        Some("x11") => x11_score += 4,
        Some("wayland") => wayland_score += 4,
        _ => {}
    }
    if wayland_display.is_some() {
        wayland_score += 2;
    }
    // DISPLAY is also set under XWayland, so it is weak evidence
    if x11_display.is_some() {
        x11_score += 1;
    }

    let display_server = if wayland_score > x11_score {
        DisplayServer::Wayland
    } else if x11_score > wayland_score {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    };

    // Without XDG_SESSION_TYPE fall back to the scored guess
    let session_type = session_type.unwrap_or_else(|| match display_server {
        DisplayServer::Unknown => String::new(),
        known => known.to_string(),
    });

    let info = SessionInfo {
        session_type,
        display_server,
        desktop_environment: desktop,
    };
    debug!("Detected session: {:?}", info);
    info
}

/// Whether a session type string means X11
pub fn is_x11_session(session_type: &str) -> bool {
    session_type.trim().eq_ignore_ascii_case("x11")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_x11_session() {
        assert!(is_x11_session("x11"));
        assert!(is_x11_session("X11"));
        assert!(!is_x11_session("wayland"));
        assert!(!is_x11_session(""));
    }

    #[test]
    fn test_detect_session_does_not_panic() {
        let info = detect_session();
        println!("Detected: {:?}", info);
    }
}
