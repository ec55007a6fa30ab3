//! Applying a macro: clipboard write, then a delayed paste
//!
//! The paste delay is a one-shot timer on the tokio event loop. Each apply
//! schedules its own timer; a macro fired while another one's delay is still
//! running does not cancel it, so the two pastes may interleave.
//!
//! The dispatch itself runs synchronously on the loop thread and waits for the
//! paste tool to exit. Paste order therefore cannot race later clipboard
//! writes, but a hung tool stalls the loop.

use std::sync::Arc;

use macruntu_paste::{CommandRunner, DispatchOutcome, MacroConfig, PasteDispatcher, SystemRunner};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clipboard::{ClipboardBackend, ClipboardError};

/// Errors applying a macro
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Macro {index} does not exist ({count} configured)")]
    NoSuchMacro { index: usize, count: usize },

    #[error("Clipboard write failed: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// What happened to the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// Text copied
    Copied,
    /// Secret text copied; callers should not echo it
    CopiedSecret,
    /// Macro has no text, nothing done
    Skipped,
}

impl ApplyStatus {
    /// Short line shown to the UI / IPC client
    pub fn message(&self) -> &'static str {
        match self {
            Self::Copied => "ok",
            Self::CopiedSecret => "ok secret",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of one apply
#[derive(Debug)]
pub struct ApplyReport {
    pub status: ApplyStatus,
    /// Immediate paste result (no delay configured)
    pub pasted: Option<DispatchOutcome>,
    /// Pending delayed paste, if one was scheduled
    pub pending_paste: Option<JoinHandle<DispatchOutcome>>,
}

impl ApplyReport {
    fn without_paste(status: ApplyStatus) -> Self {
        Self {
            status,
            pasted: None,
            pending_paste: None,
        }
    }

    /// Wait for a scheduled paste to run; `None` if nothing was dispatched
    pub async fn finish(self) -> Option<DispatchOutcome> {
        match self.pending_paste {
            Some(handle) => handle.await.ok(),
            None => self.pasted,
        }
    }
}

/// Writes macro text to the clipboard and schedules the paste
pub struct MacroApplier<R = SystemRunner> {
    macros: Arc<Vec<MacroConfig>>,
    clipboard: Box<dyn ClipboardBackend>,
    dispatcher: Arc<PasteDispatcher<R>>,
}

impl<R> MacroApplier<R>
where
    R: CommandRunner + Send + Sync + 'static,
{
    pub fn new(
        macros: Vec<MacroConfig>,
        clipboard: Box<dyn ClipboardBackend>,
        dispatcher: PasteDispatcher<R>,
    ) -> Self {
        Self {
            macros: Arc::new(macros),
            clipboard,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn macros(&self) -> &[MacroConfig] {
        &self.macros
    }

    pub fn dispatcher(&self) -> &PasteDispatcher<R> {
        &self.dispatcher
    }

    /// Apply the macro at 1-based `index`
    pub fn apply_index(&self, index: usize) -> Result<ApplyReport, ApplyError> {
        let macro_config = index
            .checked_sub(1)
            .and_then(|i| self.macros.get(i))
            .ok_or(ApplyError::NoSuchMacro {
                index,
                count: self.macros.len(),
            })?;
        self.apply(macro_config)
    }

    /// Copy the macro's text and paste it if configured.
    ///
    /// Must be called inside a tokio runtime when the macro has a paste delay.
    pub fn apply(&self, macro_config: &MacroConfig) -> Result<ApplyReport, ApplyError> {
        if macro_config.text.is_empty() {
            debug!("Macro {:?} has no text, skipping", macro_config.label);
            return Ok(ApplyReport::without_paste(ApplyStatus::Skipped));
        }

        self.clipboard.write_text(&macro_config.text)?;

        let status = if macro_config.secret {
            info!("Secret copied ({:?}) via {}", macro_config.label, self.clipboard.name());
            ApplyStatus::CopiedSecret
        } else {
            info!(
                "Copied {:?} ({} chars) via {}",
                macro_config.label,
                macro_config.text.chars().count(),
                self.clipboard.name()
            );
            ApplyStatus::Copied
        };

        if !macro_config.paste {
            return Ok(ApplyReport::without_paste(status));
        }

        let Some(delay) = macro_config.paste_delay() else {
            return Ok(ApplyReport {
                status,
                pasted: Some(self.dispatcher.dispatch(macro_config)),
                pending_paste: None,
            });
        };

        debug!("Pasting {:?} in {:?}", macro_config.label, delay);
        let dispatcher = Arc::clone(&self.dispatcher);
        let macro_config = macro_config.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatcher.dispatch(&macro_config)
        });

        Ok(ApplyReport {
            status,
            pasted: None,
            pending_paste: Some(handle),
        })
    }
}
