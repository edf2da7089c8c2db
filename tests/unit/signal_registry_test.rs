//! Tests for the signal registry: ordering, propagation, detail matching and
//! changes to the handler set made while a signal is being emitted.

use std::cell::Cell;
use std::rc::Rc;

use npc_shell::managers::signal_registry::SignalRegistry;
use npc_shell::types::signal::{
    script_message_signal, Propagation, Signal, DESTROY, SCRIPT_MESSAGE_RECEIVED,
};
use serde_json::json;

type Log = Vec<&'static str>;

fn message(channel: &str) -> Signal {
    Signal::ScriptMessage {
        channel: channel.to_string(),
        body: json!(null),
    }
}

#[test]
fn test_handlers_run_in_connection_order() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    registry.connect(DESTROY, |log, _, _| {
        log.push("first");
        Propagation::Proceed
    });
    registry.connect(DESTROY, |log, _, _| {
        log.push("second");
        Propagation::Proceed
    });

    let mut log = Log::new();
    let result = registry.emit(&mut log, &Signal::WindowDestroyed);

    assert_eq!(result, Propagation::Proceed);
    assert_eq!(log, vec!["first", "second"]);
}

#[test]
fn test_stop_ends_emission() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    registry.connect(DESTROY, |log, _, _| {
        log.push("first");
        Propagation::Stop
    });
    registry.connect(DESTROY, |log, _, _| {
        log.push("second");
        Propagation::Proceed
    });

    let mut log = Log::new();
    let result = registry.emit(&mut log, &Signal::WindowDestroyed);

    assert_eq!(result, Propagation::Stop);
    assert_eq!(log, vec!["first"]);
}

#[test]
fn test_detailed_and_base_names() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    registry.connect(&script_message_signal("command"), |log, _, _| {
        log.push("command");
        Propagation::Proceed
    });
    registry.connect(SCRIPT_MESSAGE_RECEIVED, |log, _, _| {
        log.push("any");
        Propagation::Proceed
    });

    let mut log = Log::new();
    registry.emit(&mut log, &message("command"));
    registry.emit(&mut log, &message("hostChannel"));

    assert_eq!(log, vec!["command", "any", "any"]);
}

#[test]
fn test_unmatched_signal_is_not_handled() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    registry.connect(DESTROY, |_, _, _| Propagation::Stop);

    let mut log = Log::new();

    assert_eq!(
        registry.emit(&mut log, &Signal::SurfaceCloseRequested),
        Propagation::Proceed
    );
}

#[test]
fn test_disconnect() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    let id = registry.connect(DESTROY, |_, _, _| Propagation::Stop);

    assert_eq!(registry.handler_count(DESTROY), 1);
    assert!(registry.disconnect(id));
    assert!(!registry.disconnect(id));
    assert_eq!(registry.handler_count(DESTROY), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_handler_connected_during_emission_runs_from_next_emission() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    let connected = Rc::new(Cell::new(false));
    let once = Rc::clone(&connected);
    registry.connect(DESTROY, move |log, _, signals| {
        log.push("outer");
        if !once.replace(true) {
            signals.connect(DESTROY, |log, _, _| {
                log.push("late");
                Propagation::Proceed
            });
        }
        Propagation::Proceed
    });

    let mut log = Log::new();
    registry.emit(&mut log, &Signal::WindowDestroyed);
    assert_eq!(log, vec!["outer"]);

    log.clear();
    registry.emit(&mut log, &Signal::WindowDestroyed);
    assert_eq!(log, vec!["outer", "late"]);
    assert!(connected.get());
}

#[test]
fn test_handler_disconnected_during_emission_does_not_run() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    let victim = Rc::new(Cell::new(0));

    let target = Rc::clone(&victim);
    registry.connect(DESTROY, move |log, _, signals| {
        log.push("first");
        signals.disconnect(target.get());
        Propagation::Proceed
    });
    let id = registry.connect(DESTROY, |log, _, _| {
        log.push("second");
        Propagation::Proceed
    });
    victim.set(id);

    let mut log = Log::new();
    registry.emit(&mut log, &Signal::WindowDestroyed);

    assert_eq!(log, vec!["first"]);
    assert_eq!(registry.handler_count(DESTROY), 1);
}

#[test]
fn test_disconnect_during_emission_of_stale_id_reports_false() {
    let mut registry: SignalRegistry<Log> = SignalRegistry::new();
    let stale = registry.connect(DESTROY, |_, _, _| Propagation::Proceed);
    assert!(registry.disconnect(stale));

    let result = Rc::new(Cell::new(None));
    let seen = Rc::clone(&result);
    registry.connect(DESTROY, move |_, _, signals| {
        seen.set(Some(signals.disconnect(stale)));
        Propagation::Proceed
    });

    let mut log = Log::new();
    registry.emit(&mut log, &Signal::WindowDestroyed);

    assert_eq!(result.get(), Some(false));
    assert_eq!(registry.handler_count(DESTROY), 1);
}
