//! Dispatch policy tests
//!
//! Every test runs against a fabricated BackendSet and a recording runner, so
//! nothing is ever typed into the machine running the tests.

mod test_helpers;

use macruntu_paste::{
    select, Backend, BackendSet, DispatchOutcome, PasteCommand, PasteDispatcher, PastePlan,
};
use test_helpers::*;

fn dispatch_argvs(
    config: &macruntu_paste::MacroConfig,
    session: &str,
    set: BackendSet,
) -> Vec<Vec<String>> {
    let dispatcher = PasteDispatcher::with_runner(set, session, RecordingRunner::new());
    dispatcher.dispatch(config);
    dispatcher.runner().argvs()
}

#[test]
fn test_paste_disabled_runs_nothing() {
    let mut config = paste_macro("ctrl+v");
    config.paste = false;
    config.paste_backend = Some(Backend::Xdotool);
    config.paste_command = Some(PasteCommand::Line("echo nope".into()));

    let dispatcher = PasteDispatcher::with_runner(all_backends(), "x11", RecordingRunner::new());
    let outcome = dispatcher.dispatch(&config);

    assert!(matches!(outcome, DispatchOutcome::Skipped));
    assert!(dispatcher.runner().calls().is_empty());
}

#[test]
fn test_paste_command_bypasses_everything() {
    // Unparsable keys and an unavailable backend must not matter
    let mut config = paste_macro_with_command(PasteCommand::Line(
        "sh -c 'xdotool key ctrl+v'".into(),
    ));
    config.paste_keys = "   ".into();
    config.paste_backend = Some(Backend::Ydotool);

    let argvs = dispatch_argvs(&config, "wayland", BackendSet::default());
    assert_eq!(argvs, vec![strings(&["sh", "-c", "xdotool key ctrl+v"])]);
}

#[test]
fn test_paste_command_argument_list_is_verbatim() {
    let config = paste_macro_with_command(PasteCommand::Args(strings(&[
        "/opt/paste helper",
        "--mode",
        "$HOME",
    ])));

    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert_eq!(argvs, vec![strings(&["/opt/paste helper", "--mode", "$HOME"])]);
}

#[test]
fn test_broken_paste_command_runs_nothing() {
    let config = paste_macro_with_command(PasteCommand::Line("echo 'unterminated".into()));
    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert!(argvs.is_empty());
}

#[test]
fn test_empty_paste_command_falls_back_to_keys() {
    let config = paste_macro_with_command(PasteCommand::Line(String::new()));
    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert_eq!(
        argvs,
        vec![strings(&["xdotool", "key", "--clearmodifiers", "ctrl+v"])]
    );
}

#[test]
fn test_unparsable_combo_runs_nothing() {
    let config = paste_macro(" + ");
    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert!(argvs.is_empty());
}

#[test]
fn test_explicit_xdotool() {
    let config = paste_macro_with_backend("Ctrl+Shift+V", Backend::Xdotool);
    // Explicit choice wins even outside X11
    let argvs = dispatch_argvs(&config, "wayland", all_backends());
    assert_eq!(
        argvs,
        vec![strings(&["xdotool", "key", "--clearmodifiers", "Ctrl+Shift+V"])]
    );
}

#[test]
fn test_explicit_wtype_press_and_reverse_release() {
    let config = paste_macro_with_backend("ctrl+alt+v", Backend::Wtype);
    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert_eq!(
        argvs,
        vec![strings(&[
            "wtype", "-M", "ctrl", "-M", "alt", "v", "-m", "alt", "-m", "ctrl"
        ])]
    );
}

#[test]
fn test_explicit_wtype_stops_even_when_it_fails() {
    let config = paste_macro_with_backend("ctrl+v", Backend::Wtype);
    let dispatcher =
        PasteDispatcher::with_runner(all_backends(), "wayland", RecordingRunner::exiting_with(1));

    let outcome = dispatcher.dispatch(&config);

    assert!(matches!(outcome, DispatchOutcome::Ran { plan: "wtype", .. }));
    assert!(!outcome.is_success());
    assert_eq!(dispatcher.runner().calls().len(), 1);
}

#[test]
fn test_explicit_ydotool_event_stream() {
    let config = paste_macro_with_backend("ctrl+shift+v", Backend::Ydotool);
    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert_eq!(
        argvs,
        vec![strings(&[
            "ydotool", "key", "29:1", "42:1", "47:1", "47:0", "42:0", "29:0"
        ])]
    );
}

#[test]
fn test_explicit_ydotool_unmapped_key_aborts_without_fallback() {
    let config = paste_macro_with_backend("ctrl+print", Backend::Ydotool);
    let argvs = dispatch_argvs(&config, "x11", all_backends());
    assert!(argvs.is_empty());
}

#[test]
fn test_unavailable_explicit_backend_uses_session_fallback() {
    let config = paste_macro_with_backend("ctrl+v", Backend::Xdotool);
    let argvs = dispatch_argvs(&config, "wayland", backends(&[Backend::Wtype]));
    assert_eq!(argvs, vec![strings(&["wtype", "-M", "ctrl", "v", "-m", "ctrl"])]);
}

#[test]
fn test_x11_session_prefers_xdotool() {
    let config = paste_macro("ctrl+v");
    let argvs = dispatch_argvs(&config, "X11", all_backends());
    assert_eq!(
        argvs,
        vec![strings(&["xdotool", "key", "--clearmodifiers", "ctrl+v"])]
    );
}

#[test]
fn test_x11_without_xdotool_uses_wtype_then_ydotool() {
    let config = paste_macro("ctrl+v");

    let argvs = dispatch_argvs(&config, "x11", backends(&[Backend::Wtype, Backend::Ydotool]));
    assert_eq!(argvs[0][0], "wtype");

    let argvs = dispatch_argvs(&config, "x11", backends(&[Backend::Ydotool]));
    assert_eq!(argvs, vec![strings(&["ydotool", "key", "29:1", "47:1", "47:0", "29:0"])]);
}

#[test]
fn test_wayland_ignores_xdotool() {
    let config = paste_macro("ctrl+v");
    let argvs = dispatch_argvs(&config, "wayland", backends(&[Backend::Xdotool, Backend::Ydotool]));
    assert_eq!(argvs[0][0], "ydotool");
}

#[test]
fn test_fallback_wtype_does_not_retry_ydotool() {
    let config = paste_macro("ctrl+v");
    let dispatcher = PasteDispatcher::with_runner(
        backends(&[Backend::Wtype, Backend::Ydotool]),
        "wayland",
        RecordingRunner::exiting_with(1),
    );

    dispatcher.dispatch(&config);
    assert_eq!(dispatcher.runner().argvs().len(), 1);
    assert_eq!(dispatcher.runner().argvs()[0][0], "wtype");
}

#[test]
fn test_no_backend_is_silent_noop() {
    let config = paste_macro("ctrl+v");
    let dispatcher =
        PasteDispatcher::with_runner(BackendSet::default(), "wayland", RecordingRunner::new());

    assert!(matches!(dispatcher.dispatch(&config), DispatchOutcome::Skipped));
    assert!(dispatcher.runner().calls().is_empty());
}

#[test]
fn test_only_xdotool_on_wayland_is_a_gap() {
    let config = paste_macro("ctrl+v");
    let argvs = dispatch_argvs(&config, "wayland", backends(&[Backend::Xdotool]));
    assert!(argvs.is_empty());
}

#[test]
fn test_spawn_failure_is_absorbed() {
    let config = paste_macro("ctrl+v");
    let dispatcher =
        PasteDispatcher::with_runner(all_backends(), "x11", RecordingRunner::failing_spawn());

    let outcome = dispatcher.dispatch(&config);
    assert!(matches!(outcome, DispatchOutcome::Failed { plan: "xdotool", .. }));
}

#[test]
fn test_selection_is_deterministic() {
    let config = paste_macro("super+shift+f3");
    let set = backends(&[Backend::Ydotool, Backend::Wtype]);

    let first = select(&config, "wayland", &set);
    let second = select(&config, "wayland", &set);
    assert_eq!(first, second);
    assert!(matches!(first, Some(PastePlan::Wtype { .. })));

    let a = dispatch_argvs(&config, "wayland", set.clone());
    let b = dispatch_argvs(&config, "wayland", set);
    assert_eq!(a, b);
}

#[test]
fn test_resolved_tool_path_is_used() {
    let set = BackendSet {
        ydotool: Some("/usr/local/bin/ydotool".into()),
        ..Default::default()
    };
    let config = paste_macro("enter");
    let argvs = dispatch_argvs(&config, "", set);
    assert_eq!(argvs, vec![strings(&["/usr/local/bin/ydotool", "key", "28:1", "28:0"])]);
}
