//! Test helpers for dispatch and session detection
//!
//! Provides:
//! - A recording command runner (no processes are spawned)
//! - Environment fixtures for X11 / Wayland sessions
//! - Macro builders

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use macruntu_paste::{
    Backend, BackendSet, CommandRunner, Invocation, MacroConfig, PasteCommand, PasteError,
};

/// Records every invocation and answers with a fixed exit code
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Invocation>>,
    exit_code: i32,
    fail_spawn: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::exiting_with(0)
    }

    pub fn exiting_with(exit_code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code,
            fail_spawn: false,
        }
    }

    pub fn failing_spawn() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code: 0,
            fail_spawn: true,
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Calls rendered as argv vectors, program first
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .map(|inv| {
                let mut argv = vec![inv.program.display().to_string()];
                argv.extend(inv.args.iter().cloned());
                argv
            })
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> macruntu_paste::Result<ExitStatus> {
        self.calls.borrow_mut().push(invocation.clone());
        if self.fail_spawn {
            return Err(PasteError::spawn(
                &invocation.program,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        // Raw wait status: exit code lives in the high byte
        Ok(ExitStatus::from_raw(self.exit_code << 8))
    }
}

/// Backends "installed" under their bare command names
pub fn backends(available: &[Backend]) -> BackendSet {
    BackendSet::with_available(available)
}

pub fn all_backends() -> BackendSet {
    backends(&Backend::ALL)
}

/// Macro with auto-paste enabled
pub fn paste_macro(keys: &str) -> MacroConfig {
    let mut config = MacroConfig::new("Test", "hello");
    config.paste = true;
    config.paste_keys = keys.to_string();
    config
}

pub fn paste_macro_with_backend(keys: &str, backend: Backend) -> MacroConfig {
    let mut config = paste_macro(keys);
    config.paste_backend = Some(backend);
    config
}

pub fn paste_macro_with_command(command: PasteCommand) -> MacroConfig {
    let mut config = paste_macro("ctrl+v");
    config.paste_command = Some(command);
    config
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Test fixture for X11 environment
pub fn x11_env() -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert("DISPLAY".to_string(), ":0".to_string());
    env.insert("XDG_SESSION_TYPE".to_string(), "x11".to_string());
    env
}

/// Test fixture for Wayland (KDE) environment
pub fn wayland_kde_env() -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert("WAYLAND_DISPLAY".to_string(), "wayland-0".to_string());
    env.insert("XDG_SESSION_TYPE".to_string(), "wayland".to_string());
    env.insert("XDG_CURRENT_DESKTOP".to_string(), "KDE".to_string());
    env
}

/// Test fixture for XWayland (both displays set, Wayland session)
pub fn xwayland_env() -> HashMap<String, String> {
    let mut env = wayland_kde_env();
    env.insert("DISPLAY".to_string(), ":1".to_string());
    env
}

/// Test fixture for an old X server that sets only DISPLAY
pub fn ambiguous_env() -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert("DISPLAY".to_string(), ":0".to_string());
    env
}

/// Test fixture for headless / TTY
pub fn headless_env() -> HashMap<String, String> {
    HashMap::new()
}
