//! Error types for paste dispatch

use std::path::PathBuf;

use thiserror::Error;

/// Result type for paste operations
pub type Result<T> = std::result::Result<T, PasteError>;

/// Paste error types
///
/// None of these reach the user: the dispatcher folds them into a
/// [`DispatchOutcome`](crate::DispatchOutcome) and logs them.
#[derive(Error, Debug)]
pub enum PasteError {
    /// The tool could not be started at all
    #[error("Failed to launch {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A paste_command string that shell-style splitting rejects
    #[error("Invalid paste command: {0}")]
    InvalidCommand(String),

    /// A paste_command that splits into nothing
    #[error("Empty paste command")]
    EmptyCommand,
}

impl PasteError {
    pub fn spawn<P: Into<PathBuf>>(program: P, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    pub fn invalid_command<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCommand(msg.into())
    }
}
