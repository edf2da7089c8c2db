//! Lifecycle tests for `AppShell`, driven through the headless backend.
//!
//! Each test plays the part of the event loop: it starts the shell, dispatches the
//! signals the toolkit would deliver, and inspects the recorded backend calls.

use npc_shell::app::{AppShell, ShellPhase, ACTIVATION_FAILURE_EXIT_CODE};
use npc_shell::backend::{BackendAction, HeadlessBackend, SurfaceSpec, WindowSpec};
use npc_shell::services::theme_store::ThemeStore;
use npc_shell::types::config::ShellConfig;
use npc_shell::types::errors::ShellError;
use npc_shell::types::signal::{LoadStage, Propagation, Signal, DELETE_EVENT};
use serde_json::json;
use tempfile::TempDir;

fn shell_with(dir: &TempDir, config: ShellConfig, backend: HeadlessBackend) -> AppShell<HeadlessBackend> {
    let theme = ThemeStore::new(Some(dir.path().join("theme.json")));
    AppShell::new(config, backend, theme).unwrap()
}

fn started_shell(dir: &TempDir) -> AppShell<HeadlessBackend> {
    let mut shell = shell_with(dir, ShellConfig::default(), HeadlessBackend::new());
    shell.start(&[]).unwrap();
    shell
}

fn command(body: serde_json::Value) -> Signal {
    Signal::ScriptMessage {
        channel: "command".to_string(),
        body,
    }
}

fn count(shell: &AppShell<HeadlessBackend>, pred: impl Fn(&BackendAction) -> bool) -> usize {
    shell.context().backend().count(pred)
}

#[test]
fn test_start_builds_window_then_surface_then_navigates_and_shows() {
    let dir = TempDir::new().unwrap();
    let shell = started_shell(&dir);

    assert_eq!(
        shell.context().backend().actions(),
        &[
            BackendAction::CreateWindow(WindowSpec {
                title: "NPC".to_string(),
                width: 800,
                height: 600,
            }),
            BackendAction::CreateSurface(SurfaceSpec {
                channels: vec!["command".to_string(), "hostChannel".to_string()],
                devtools: cfg!(debug_assertions),
                background: None,
            }),
            BackendAction::AttachSurface,
            BackendAction::Navigate("http://localhost:3000/".to_string()),
            BackendAction::Show,
        ]
    );
    assert_eq!(shell.phase(), ShellPhase::Running);
    assert!(shell.context().window_open());
    assert!(shell.context().backend().surface_attached());
}

#[test]
fn test_exactly_one_window_is_created() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    // A second activation from the toolkit must not build another window.
    shell.dispatch(Signal::Activate);

    assert_eq!(count(&shell, |a| matches!(a, BackendAction::CreateWindow(_))), 1);
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::AttachSurface)), 1);
    assert_eq!(shell.phase(), ShellPhase::Running);
}

#[test]
fn test_navigates_to_configured_url() {
    let dir = TempDir::new().unwrap();
    let mut config = ShellConfig::default();
    config.url = "https://npc.example/app".to_string();
    let mut shell = shell_with(&dir, config, HeadlessBackend::new());
    shell.start(&["npc-shell".to_string()]).unwrap();

    assert_eq!(
        count(&shell, |a| *a == BackendAction::Navigate("https://npc.example/app".to_string())),
        1
    );
}

#[test]
fn test_command_message_destroys_window_and_quits() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    let verdict = shell.dispatch(command(json!({"action": "anything"})));

    assert_eq!(verdict, Propagation::Stop);
    assert!(!shell.context().window_open());
    assert_eq!(shell.phase(), ShellPhase::Terminated);
    assert_eq!(shell.exit_code(), 0);
    let tail = &shell.context().backend().actions()[5..];
    assert_eq!(tail, &[BackendAction::DestroyWindow, BackendAction::Quit(0)]);
}

#[test]
fn test_second_command_message_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    shell.dispatch(command(json!("close")));
    shell.dispatch(command(json!(null)));

    assert_eq!(count(&shell, |a| matches!(a, BackendAction::DestroyWindow)), 1);
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::Quit(_))), 1);
}

#[test]
fn test_window_close_request_terminates_once() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    let verdict = shell.dispatch(Signal::WindowCloseRequested);
    shell.dispatch(Signal::WindowCloseRequested);
    shell.dispatch(Signal::WindowDestroyed);

    assert_eq!(verdict, Propagation::Proceed);
    assert_eq!(shell.phase(), ShellPhase::Terminated);
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::DestroyWindow)), 1);
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::Quit(_))), 1);
}

#[test]
fn test_surface_close_is_handled_and_destroys_window_immediately() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    let verdict = shell.dispatch(Signal::SurfaceCloseRequested);

    assert_eq!(verdict, Propagation::Stop);
    assert!(!shell.context().backend().has_window());
    assert_eq!(shell.phase(), ShellPhase::Terminated);
}

#[test]
fn test_stopping_delete_event_keeps_window_open() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);
    shell
        .signals_mut()
        .connect(DELETE_EVENT, |_ctx, _signal, _signals| Propagation::Stop);

    let verdict = shell.dispatch(Signal::WindowCloseRequested);

    assert_eq!(verdict, Propagation::Stop);
    assert!(shell.context().window_open());
    assert_eq!(shell.phase(), ShellPhase::Running);
}

#[test]
fn test_activation_failure_quits_with_error_code() {
    let dir = TempDir::new().unwrap();
    let mut backend = HeadlessBackend::new();
    backend.fail_window_creation("no display");
    let mut shell = shell_with(&dir, ShellConfig::default(), backend);

    shell.start(&[]).unwrap();

    assert_eq!(shell.phase(), ShellPhase::Terminated);
    assert_eq!(shell.exit_code(), ACTIVATION_FAILURE_EXIT_CODE);
    assert_eq!(
        shell.context().backend().actions(),
        &[BackendAction::Quit(ACTIVATION_FAILURE_EXIT_CODE)]
    );
}

#[test]
fn test_second_start_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    let err = shell.start(&[]).unwrap_err();

    assert!(matches!(err, ShellError::InvalidPhase(_)));
}

#[test]
fn test_invalid_config_is_rejected_before_start() {
    let dir = TempDir::new().unwrap();
    let mut config = ShellConfig::default();
    config.window.width = 0;

    let result = AppShell::new(
        config,
        HeadlessBackend::new(),
        ThemeStore::new(Some(dir.path().join("theme.json"))),
    );

    assert!(matches!(result, Err(ShellError::Config(_))));
}

#[test]
fn test_signals_before_start_are_dropped() {
    let dir = TempDir::new().unwrap();
    let mut shell = shell_with(&dir, ShellConfig::default(), HeadlessBackend::new());

    let verdict = shell.dispatch(command(json!("close")));

    assert_eq!(verdict, Propagation::Proceed);
    assert!(shell.context().backend().actions().is_empty());
    assert_eq!(shell.phase(), ShellPhase::Uninitialized);
}

#[test]
fn test_message_on_unregistered_channel_is_not_handled() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    let verdict = shell.dispatch(Signal::ScriptMessage {
        channel: "other".to_string(),
        body: json!("close"),
    });

    assert_eq!(verdict, Propagation::Proceed);
    assert!(shell.context().window_open());
}

#[test]
fn test_load_finished_runs_configured_script() {
    let dir = TempDir::new().unwrap();
    let mut config = ShellConfig::default();
    config.diagnostics.on_load_script = Some("document.title".to_string());
    let mut shell = shell_with(&dir, config, HeadlessBackend::new());
    shell.start(&[]).unwrap();

    shell.dispatch(Signal::LoadChanged {
        stage: LoadStage::Started,
        url: "http://localhost:3000/".to_string(),
    });
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::EvaluateScript(_))), 0);

    shell.dispatch(Signal::LoadChanged {
        stage: LoadStage::Finished,
        url: "http://localhost:3000/".to_string(),
    });
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::EvaluateScript(_))), 1);

    shell
        .context_mut()
        .backend_mut()
        .push_script_result(Ok(r#"{"ok":"NPC"}"#.to_string()));
    assert_eq!(shell.context_mut().backend_mut().flush_scripts(), 1);
}

#[test]
fn test_theme_message_applies_background_and_survives_restart() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    let verdict = shell.dispatch(Signal::ScriptMessage {
        channel: "hostChannel".to_string(),
        body: json!({
            "type": "themeChanged",
            "values": {
                "type": "dark",
                "values": { "colors": { "editorGroupHeader.tabsBackground": "#1e1e1e" } }
            }
        }),
    });

    assert_eq!(verdict, Propagation::Stop);
    assert_eq!(
        count(&shell, |a| *a == BackendAction::SetBackground((0x1e, 0x1e, 0x1e, 255))),
        1
    );

    // The next process paints the stored background before the page loads.
    let restarted = started_shell(&dir);
    let first_surface = restarted
        .context()
        .backend()
        .actions()
        .iter()
        .find_map(|a| match a {
            BackendAction::CreateSurface(spec) => Some(spec.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_surface.background, Some((0x1e, 0x1e, 0x1e, 255)));
}

#[test]
fn test_disabled_host_channel_is_not_exposed() {
    let dir = TempDir::new().unwrap();
    let mut config = ShellConfig::default();
    config.channels.host = None;
    let mut shell = shell_with(&dir, config, HeadlessBackend::new());
    shell.start(&[]).unwrap();

    let verdict = shell.dispatch(Signal::ScriptMessage {
        channel: "hostChannel".to_string(),
        body: json!("hello"),
    });

    assert_eq!(verdict, Propagation::Proceed);
    assert_eq!(
        count(&shell, |a| matches!(a, BackendAction::CreateSurface(spec) if spec.channels == vec!["command".to_string()])),
        1
    );
}

#[test]
fn test_close_instance_on_host_channel_closes_window_once() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);
    let close = Signal::ScriptMessage {
        channel: "hostChannel".to_string(),
        body: json!({"command": "closeInstance"}),
    };

    let verdict = shell.dispatch(close.clone());
    shell.dispatch(close);

    assert_eq!(verdict, Propagation::Stop);
    assert_eq!(shell.phase(), ShellPhase::Terminated);
    assert_eq!(count(&shell, |a| matches!(a, BackendAction::DestroyWindow)), 1);
    assert_eq!(count(&shell, |a| *a == BackendAction::Quit(0)), 1);
}

#[test]
fn test_unknown_host_command_keeps_window_open() {
    let dir = TempDir::new().unwrap();
    let mut shell = started_shell(&dir);

    shell.dispatch(Signal::ScriptMessage {
        channel: "hostChannel".to_string(),
        body: json!({"command": "getApplicationData"}),
    });

    assert!(shell.context().window_open());
    assert_eq!(shell.phase(), ShellPhase::Running);
}
