//! Macro definitions as stored in the config file

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::{deserialize_lenient_backend, Backend};
use crate::error::{PasteError, Result};

/// Default delay between the clipboard write and the paste keystroke
pub const DEFAULT_PASTE_DELAY_MS: i64 = 150;

/// Default paste combo
pub const DEFAULT_PASTE_KEYS: &str = "ctrl+v";

/// One user-defined macro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroConfig {
    /// Button label
    #[serde(default)]
    pub label: String,

    /// Text written to the clipboard
    #[serde(default)]
    pub text: String,

    /// Secret macros are never logged or kept in history
    #[serde(default)]
    pub secret: bool,

    /// Synthesize a paste keystroke after copying
    #[serde(default)]
    pub paste: bool,

    /// Delay before pasting; zero or negative pastes immediately.
    /// Fractional values are truncated toward zero.
    #[serde(
        default = "default_paste_delay_ms",
        deserialize_with = "deserialize_delay_ms"
    )]
    pub paste_delay_ms: i64,

    /// Combo sent to the focused application
    #[serde(default = "default_paste_keys")]
    pub paste_keys: String,

    /// Force a specific backend instead of session detection
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_backend",
        skip_serializing_if = "Option::is_none"
    )]
    pub paste_backend: Option<Backend>,

    /// Run this instead of any backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste_command: Option<PasteCommand>,
}

fn default_paste_delay_ms() -> i64 {
    DEFAULT_PASTE_DELAY_MS
}

/// Accept an integer or a float number of milliseconds
fn deserialize_delay_ms<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Int(i64),
        Float(f64),
    }

    Ok(match Millis::deserialize(deserializer)? {
        Millis::Int(ms) => ms,
        // Saturating cast; NaN becomes 0
        Millis::Float(ms) => ms.trunc() as i64,
    })
}

fn default_paste_keys() -> String {
    DEFAULT_PASTE_KEYS.to_string()
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            text: String::new(),
            secret: false,
            paste: false,
            paste_delay_ms: DEFAULT_PASTE_DELAY_MS,
            paste_keys: default_paste_keys(),
            paste_backend: None,
            paste_command: None,
        }
    }
}

impl MacroConfig {
    /// Copy-only macro
    pub fn new<L: Into<String>, T: Into<String>>(label: L, text: T) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Delay to wait before dispatching, or `None` to paste immediately
    pub fn paste_delay(&self) -> Option<Duration> {
        u64::try_from(self.paste_delay_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// The override command, if one is configured and non-empty
    pub fn effective_paste_command(&self) -> Option<&PasteCommand> {
        self.paste_command.as_ref().filter(|cmd| !cmd.is_empty())
    }
}

/// A user-supplied paste command
///
/// Either a single line split shell-style (`"xdotool key ctrl+v"`) or an
/// explicit argument list (`["xdotool", "key", "ctrl+v"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PasteCommand {
    Line(String),
    Args(Vec<String>),
}

impl PasteCommand {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Line(line) => line.trim().is_empty(),
            Self::Args(args) => args.is_empty(),
        }
    }

    /// Argument vector to execute, program first
    pub fn to_argv(&self) -> Result<Vec<String>> {
        let argv = match self {
            Self::Line(line) => shlex::split(line).ok_or_else(|| {
                PasteError::invalid_command(format!("unbalanced quoting in {:?}", line))
            })?,
            Self::Args(args) => args.clone(),
        };

        if argv.is_empty() {
            return Err(PasteError::EmptyCommand);
        }
        Ok(argv)
    }
}
