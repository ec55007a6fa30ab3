//! Macruntu service library
//!
//! Re-exports the service modules for the `macruntu` binary and integration tests.

pub mod applier;
pub mod clipboard;
pub mod config;
pub mod ipc;
pub mod macro_ref;

pub use applier::{ApplyError, ApplyReport, ApplyStatus, MacroApplier};
pub use clipboard::{default_clipboard, ClipboardBackend, ClipboardError};
pub use config::AppConfig;
