//! Paste dispatch: pick a backend for a macro and run it
//!
//! Selection is a pure function of (macro, session type, installed backends)
//! producing a [`PastePlan`]. Running the plan is a separate step through a
//! [`CommandRunner`], so the policy can be tested without spawning anything.
//!
//! Policy, first match wins:
//! 1. `paste` off → nothing
//! 2. `paste_command` → run it verbatim, no combo parsing
//! 3. combo does not parse → nothing
//! 4. explicit `paste_backend` that is installed → that backend
//! 5. X11 session with xdotool → xdotool
//! 6. wtype installed → wtype
//! 7. ydotool installed → ydotool
//! 8. otherwise nothing

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendSet};
use crate::combo::KeyCombo;
use crate::error::{PasteError, Result};
use crate::keycode::{keycode_for, modifier_code};
use crate::macro_config::MacroConfig;
use crate::session::is_x11_session;

/// One ydotool key event: `code:1` press, `code:0` release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u16,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(code: u16) -> Self {
        Self { code, pressed: true }
    }

    pub fn release(code: u16) -> Self {
        Self {
            code,
            pressed: false,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.code, u8::from(self.pressed))
    }
}

/// Build the ydotool event stream for a combo.
///
/// Modifiers go down in order, then the key goes down and up, then the
/// modifiers come up in reverse. Returns `None` if the key has no keycode.
pub fn ydotool_events(combo: &KeyCombo) -> Option<Vec<KeyEvent>> {
    let key_code = keycode_for(&combo.key)?;

    let mut events = Vec::with_capacity(combo.modifiers.len() * 2 + 2);
    events.extend(
        combo
            .modifiers
            .iter()
            .map(|modifier| KeyEvent::press(modifier_code(*modifier))),
    );
    events.push(KeyEvent::press(key_code));
    events.push(KeyEvent::release(key_code));
    events.extend(
        combo
            .release_order()
            .map(|modifier| KeyEvent::release(modifier_code(modifier))),
    );

    Some(events)
}

/// The chosen way to paste, fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PastePlan {
    /// User-supplied command, program first
    Command(Vec<String>),
    /// `xdotool key --clearmodifiers <combo>`
    Xdotool { tool: PathBuf, combo: String },
    /// `wtype -M <mod>... <key> -m <mod>...`
    Wtype { tool: PathBuf, combo: KeyCombo },
    /// `ydotool key <code:state>...`
    Ydotool { tool: PathBuf, events: Vec<KeyEvent> },
}

impl PastePlan {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Xdotool { .. } => Backend::Xdotool.command(),
            Self::Wtype { .. } => Backend::Wtype.command(),
            Self::Ydotool { .. } => Backend::Ydotool.command(),
        }
    }

    /// Program and arguments to execute
    pub fn invocation(&self) -> Invocation {
        match self {
            Self::Command(argv) => {
                // select() never builds an empty command
                let (program, args) = argv.split_first().map_or_else(
                    || (String::new(), Vec::new()),
                    |(program, args)| (program.clone(), args.to_vec()),
                );
                Invocation::new(program, args)
            }
            Self::Xdotool { tool, combo } => Invocation::new(
                tool,
                vec!["key".into(), "--clearmodifiers".into(), combo.clone()],
            ),
            Self::Wtype { tool, combo } => {
                let mut args = Vec::with_capacity(combo.modifiers.len() * 4 + 1);
                for modifier in &combo.modifiers {
                    args.push("-M".to_string());
                    args.push(modifier.to_string());
                }
                args.push(combo.key.clone());
                for modifier in combo.release_order() {
                    args.push("-m".to_string());
                    args.push(modifier.to_string());
                }
                Invocation::new(tool, args)
            }
            Self::Ydotool { tool, events } => {
                let mut args = Vec::with_capacity(events.len() + 1);
                args.push("key".to_string());
                args.extend(events.iter().map(KeyEvent::to_string));
                Invocation::new(tool, args)
            }
        }
    }
}

/// A process to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", shlex::try_quote(arg).unwrap_or_else(|_| arg.into()))?;
        }
        Ok(())
    }
}

/// Runs an invocation to completion
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

/// Spawns real processes and waits for them
///
/// No timeout: a tool that hangs blocks the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|e| PasteError::spawn(&invocation.program, e))
    }
}

/// What a dispatch did
#[derive(Debug)]
pub enum DispatchOutcome {
    /// No plan: paste disabled, combo unparsable, or no usable backend
    Skipped,
    /// The tool ran and exited
    Ran {
        plan: &'static str,
        status: ExitStatus,
    },
    /// The tool could not be started
    Failed { plan: &'static str, error: PasteError },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ran { status, .. } if status.success())
    }
}

/// Choose how to paste `macro_config`, without running anything.
pub fn select(
    macro_config: &MacroConfig,
    session_type: &str,
    backends: &BackendSet,
) -> Option<PastePlan> {
    if !macro_config.paste {
        return None;
    }

    if let Some(command) = macro_config.effective_paste_command() {
        return match command.to_argv() {
            Ok(argv) => Some(PastePlan::Command(argv)),
            Err(e) => {
                warn!("Not pasting {:?}: {}", macro_config.label, e);
                None
            }
        };
    }

    let Some(combo) = KeyCombo::parse(&macro_config.paste_keys) else {
        debug!("Unparsable paste_keys {:?}", macro_config.paste_keys);
        return None;
    };

    if let Some(backend) = macro_config.paste_backend {
        if let Some(tool) = backends.get(backend) {
            return plan_for(backend, tool, macro_config, combo);
        }
        debug!("Requested backend {} is not installed, using session fallback", backend);
    }

    if is_x11_session(session_type) {
        if let Some(tool) = backends.get(Backend::Xdotool) {
            return plan_for(Backend::Xdotool, tool, macro_config, combo);
        }
    }

    // Combo already parsed above, so the wtype branch always commits here
    [Backend::Wtype, Backend::Ydotool]
        .into_iter()
        .find_map(|backend| backends.get(backend).map(|tool| (backend, tool)))
        .and_then(|(backend, tool)| plan_for(backend, tool, macro_config, combo))
}

fn plan_for(
    backend: Backend,
    tool: &Path,
    macro_config: &MacroConfig,
    combo: KeyCombo,
) -> Option<PastePlan> {
    let tool = tool.to_path_buf();
    match backend {
        // xdotool understands the user's combo string as written
        Backend::Xdotool => Some(PastePlan::Xdotool {
            tool,
            combo: macro_config.paste_keys.clone(),
        }),
        Backend::Wtype => Some(PastePlan::Wtype { tool, combo }),
        Backend::Ydotool => match ydotool_events(&combo) {
            Some(events) => Some(PastePlan::Ydotool { tool, events }),
            None => {
                debug!("No ydotool keycode for {:?}", combo.key);
                None
            }
        },
    }
}

/// Picks and runs paste plans for macros
///
/// Holds the startup-probed [`BackendSet`] and session type; both are fixed
/// for the lifetime of the dispatcher.
pub struct PasteDispatcher<R = SystemRunner> {
    backends: BackendSet,
    session_type: String,
    runner: R,
}

impl PasteDispatcher<SystemRunner> {
    pub fn new<S: Into<String>>(backends: BackendSet, session_type: S) -> Self {
        Self::with_runner(backends, session_type, SystemRunner)
    }
}

impl<R: CommandRunner> PasteDispatcher<R> {
    pub fn with_runner<S: Into<String>>(
        backends: BackendSet,
        session_type: S,
        runner: R,
    ) -> Self {
        Self {
            backends,
            session_type: session_type.into(),
            runner,
        }
    }

    pub fn backends(&self) -> &BackendSet {
        &self.backends
    }

    pub fn session_type(&self) -> &str {
        &self.session_type
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The plan [`dispatch`](Self::dispatch) would run
    pub fn plan(&self, macro_config: &MacroConfig) -> Option<PastePlan> {
        select(macro_config, &self.session_type, &self.backends)
    }

    /// Paste `macro_config` into the focused window, blocking until the tool exits.
    ///
    /// Never fails: every problem degrades to "clipboard set, nothing typed"
    /// and is reported through the returned outcome and the log.
    pub fn dispatch(&self, macro_config: &MacroConfig) -> DispatchOutcome {
        let Some(plan) = self.plan(macro_config) else {
            return DispatchOutcome::Skipped;
        };

        let invocation = plan.invocation();
        debug!("Pasting via {}: {}", plan.kind(), invocation);

        match self.runner.run(&invocation) {
            Ok(status) => {
                if status.success() {
                    info!("Pasted {:?} via {}", macro_config.label, plan.kind());
                } else {
                    warn!("{} exited with {}", plan.kind(), status);
                }
                DispatchOutcome::Ran {
                    plan: plan.kind(),
                    status,
                }
            }
            Err(error) => {
                warn!("Paste via {} failed: {}", plan.kind(), error);
                DispatchOutcome::Failed {
                    plan: plan.kind(),
                    error,
                }
            }
        }
    }
}
