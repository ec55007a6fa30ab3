//! Auto-paste dispatch for Macruntu
//!
//! After a macro's text lands on the clipboard, this crate decides how to
//! synthesize the paste keystroke in the focused application and runs it.
//!
//! Three backends are supported, each with its own invocation shape:
//!
//! - **xdotool** (X11): `xdotool key --clearmodifiers ctrl+v`
//! - **wtype** (Wayland): `wtype -M ctrl v -m ctrl`
//! - **ydotool** (uinput, anywhere): `ydotool key 29:1 47:1 47:0 29:0`
//!
//! A macro may also name its own `paste_command`, which bypasses all of the
//! above.
//!
//! # Example
//!
//! ```no_run
//! use macruntu_paste::{detect_session, BackendSet, MacroConfig, PasteDispatcher};
//!
//! let backends = BackendSet::probe();
//! let session = detect_session();
//! let dispatcher = PasteDispatcher::new(backends, session.session_type);
//!
//! let mut greeting = MacroConfig::new("Greeting", "Hello!");
//! greeting.paste = true;
//! greeting.paste_keys = "ctrl+shift+v".into();
//!
//! // Clipboard must already hold the text; this only types the combo
//! let outcome = dispatcher.dispatch(&greeting);
//! println!("{:?}", outcome);
//! ```

pub mod backend;
pub mod combo;
pub mod dispatch;
mod error;
pub mod keycode;
pub mod macro_config;
pub mod session;

pub use backend::{resolve_tool, Backend, BackendSet};
pub use combo::{KeyCombo, Modifier};
pub use dispatch::{
    select, ydotool_events, CommandRunner, DispatchOutcome, Invocation, KeyEvent,
    PasteDispatcher, PastePlan, SystemRunner,
};
pub use error::{PasteError, Result};
pub use keycode::{keycode_for, modifier_code, modifier_code_for};
pub use macro_config::{MacroConfig, PasteCommand, DEFAULT_PASTE_DELAY_MS, DEFAULT_PASTE_KEYS};
pub use session::{
    detect_session, detect_session_with_env, is_x11_session, DisplayServer, EnvProvider,
    SessionInfo, SystemEnv,
};
