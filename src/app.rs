//! App Core for the NPC shell.
//!
//! `AppShell` owns the process-scoped `ShellContext` and the signal registry, and
//! walks the lifecycle: Uninitialized, Running, Terminated. Toolkit events come in
//! as `Signal`s through `dispatch`; everything runs on the event-loop thread.

use std::collections::VecDeque;

use crate::backend::{ShellBackend, SurfaceSpec, WindowSpec};
use crate::managers::signal_registry::SignalRegistry;
use crate::services::host_channel::{self, HostAction};
use crate::services::script_evaluator;
use crate::services::theme_store::{ThemeStore, ThemeStoreTrait};
use crate::types::config::ShellConfig;
use crate::types::errors::ShellError;
use crate::types::signal::{
    script_message_signal, LoadStage, Propagation, Signal, ACTIVATE, CLOSE, DESTROY, LOAD_CHANGED,
};

/// Exit code used when activation fails.
pub const ACTIVATION_FAILURE_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPhase {
    Uninitialized,
    Running,
    Terminated,
}

/// Process-scoped state handed to every signal handler.
pub struct ShellContext<B: ShellBackend> {
    config: ShellConfig,
    backend: B,
    theme: ThemeStore,
    phase: ShellPhase,
    windows_created: u32,
    window_open: bool,
    exit_code: i32,
    /// Signals raised by the shell itself, dispatched before the next toolkit event.
    pending: VecDeque<Signal>,
}

impl<B: ShellBackend> ShellContext<B> {
    fn new(config: ShellConfig, backend: B, theme: ThemeStore) -> Self {
        Self {
            config,
            backend,
            theme,
            phase: ShellPhase::Uninitialized,
            windows_created: 0,
            window_open: false,
            exit_code: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn window_open(&self) -> bool {
        self.window_open
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Window, then surface, then attachment, then navigation. The page load is
    /// not awaited. Fails if a window was already built in this process.
    pub fn build_window(&mut self) -> Result<(), ShellError> {
        if self.windows_created > 0 {
            return Err(ShellError::InvalidPhase(
                "window already created for this process".to_string(),
            ));
        }

        let window = WindowSpec {
            title: self.config.window.title.clone(),
            width: self.config.window.width,
            height: self.config.window.height,
        };
        self.backend.create_window(&window)?;
        self.windows_created += 1;
        self.window_open = true;

        let surface = SurfaceSpec {
            channels: self.config.channel_names(),
            devtools: self.config.diagnostics.devtools,
            background: self.theme.background(),
        };
        self.backend.create_surface(&surface)?;
        self.backend.attach_surface()?;

        log::info!("loading {}", self.config.url);
        self.backend.navigate(&self.config.url)?;
        Ok(())
    }

    pub fn show_window(&mut self) {
        if self.window_open {
            self.backend.show();
        }
    }

    /// Destroys the window (and its surface). Returns false if there is none.
    pub fn destroy_window(&mut self) -> bool {
        if !self.window_open {
            return false;
        }
        log::info!("destroying window");
        self.backend.destroy_window();
        self.window_open = false;
        self.pending.push_back(Signal::WindowDestroyed);
        true
    }

    /// Asks the event loop to stop. Only the first call while running has effect.
    pub fn quit(&mut self, exit_code: i32) -> bool {
        if self.phase != ShellPhase::Running {
            return false;
        }
        log::info!("quitting with exit code {}", exit_code);
        self.phase = ShellPhase::Terminated;
        self.exit_code = exit_code;
        self.backend.quit(exit_code);
        true
    }

    pub fn evaluate_script_and_log(&mut self, script: &str) {
        script_evaluator::evaluate_script_and_log(&mut self.backend, script);
    }
}

type Registry<B> = SignalRegistry<ShellContext<B>>;

/// The application shell: one window, one web surface, a few callbacks.
pub struct AppShell<B: ShellBackend + 'static> {
    ctx: ShellContext<B>,
    signals: Registry<B>,
}

impl<B: ShellBackend + 'static> AppShell<B> {
    /// Validates `config` and registers the `activate` handler.
    pub fn new(config: ShellConfig, backend: B, theme: ThemeStore) -> Result<Self, ShellError> {
        config.validate()?;
        let mut signals = SignalRegistry::new();
        signals.connect(ACTIVATE, on_activate::<B>);
        Ok(Self {
            ctx: ShellContext::new(config, backend, theme),
            signals,
        })
    }

    pub fn context(&self) -> &ShellContext<B> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ShellContext<B> {
        &mut self.ctx
    }

    pub fn signals(&self) -> &Registry<B> {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut Registry<B> {
        &mut self.signals
    }

    pub fn phase(&self) -> ShellPhase {
        self.ctx.phase
    }

    pub fn exit_code(&self) -> i32 {
        self.ctx.exit_code
    }

    /// Enters the running phase and emits `activate`.
    ///
    /// `args` are passed through from the command line; the shell defines no flags.
    pub fn start(&mut self, args: &[String]) -> Result<(), ShellError> {
        if self.ctx.phase != ShellPhase::Uninitialized {
            return Err(ShellError::InvalidPhase("shell already started".to_string()));
        }
        log::debug!("starting {} with args {:?}", self.ctx.config.application_id, args);

        if let Err(e) = self.ctx.theme.load() {
            log::warn!("theme state not loaded: {}", e);
        }

        self.ctx.phase = ShellPhase::Running;
        self.dispatch(Signal::Activate);
        Ok(())
    }

    /// Emits `signal`, applies the default action if no handler stopped it, then
    /// drains signals the handlers raised. Returns the verdict for `signal` itself.
    pub fn dispatch(&mut self, signal: Signal) -> Propagation {
        if self.ctx.phase == ShellPhase::Uninitialized {
            log::warn!("dropping {} before start", signal.detailed_name());
            return Propagation::Proceed;
        }

        self.ctx.pending.push_front(signal);
        let mut verdict = None;
        while let Some(next) = self.ctx.pending.pop_front() {
            if self.ctx.phase == ShellPhase::Terminated {
                log::debug!("dropping {} after termination", next.detailed_name());
                verdict.get_or_insert(Propagation::Proceed);
                continue;
            }
            let result = self.signals.emit(&mut self.ctx, &next);
            if !result.is_handled() {
                self.default_action(&next);
            }
            verdict.get_or_insert(result);
        }
        verdict.unwrap_or(Propagation::Proceed)
    }

    fn default_action(&mut self, signal: &Signal) {
        match signal {
            Signal::WindowCloseRequested => {
                self.ctx.destroy_window();
            }
            Signal::ScriptMessage { channel, .. } => {
                log::debug!("no handler for message on channel '{}'", channel);
            }
            _ => {}
        }
    }
}

// ─── Handlers ───

fn on_activate<B: ShellBackend + 'static>(
    ctx: &mut ShellContext<B>,
    _signal: &Signal,
    signals: &mut Registry<B>,
) -> Propagation {
    match ctx.build_window() {
        Ok(()) => {}
        // Re-activation of a running shell; the first window stays.
        Err(e @ ShellError::InvalidPhase(_)) => {
            log::warn!("ignoring activation: {}", e);
            return Propagation::Stop;
        }
        Err(e) => {
            log::error!("{}", e);
            ctx.quit(ACTIVATION_FAILURE_EXIT_CODE);
            return Propagation::Stop;
        }
    }

    signals.connect(DESTROY, on_window_destroyed::<B>);
    signals.connect(CLOSE, on_surface_close_requested::<B>);
    signals.connect(
        &script_message_signal(&ctx.config.channels.command),
        on_command_message::<B>,
    );
    if let Some(host) = ctx.config.channels.host.clone() {
        signals.connect(&script_message_signal(&host), on_host_message::<B>);
    }
    signals.connect(LOAD_CHANGED, on_load_changed::<B>);

    ctx.show_window();
    Propagation::Stop
}

fn on_window_destroyed<B: ShellBackend>(
    ctx: &mut ShellContext<B>,
    _signal: &Signal,
    _signals: &mut Registry<B>,
) -> Propagation {
    ctx.quit(0);
    Propagation::Proceed
}

fn on_surface_close_requested<B: ShellBackend>(
    ctx: &mut ShellContext<B>,
    _signal: &Signal,
    _signals: &mut Registry<B>,
) -> Propagation {
    ctx.destroy_window();
    Propagation::Stop
}

// Any message on the command channel is a shutdown request; the body is not read.
fn on_command_message<B: ShellBackend>(
    ctx: &mut ShellContext<B>,
    _signal: &Signal,
    _signals: &mut Registry<B>,
) -> Propagation {
    ctx.destroy_window();
    Propagation::Stop
}

fn on_host_message<B: ShellBackend>(
    ctx: &mut ShellContext<B>,
    signal: &Signal,
    _signals: &mut Registry<B>,
) -> Propagation {
    if let Signal::ScriptMessage { body, .. } = signal {
        let action = host_channel::dispatch(body, &mut ctx.theme, &mut ctx.backend);
        if action == HostAction::CloseRequested {
            ctx.destroy_window();
        }
    }
    Propagation::Stop
}

fn on_load_changed<B: ShellBackend>(
    ctx: &mut ShellContext<B>,
    signal: &Signal,
    _signals: &mut Registry<B>,
) -> Propagation {
    if let Signal::LoadChanged { stage, url } = signal {
        match stage {
            LoadStage::Started => log::debug!("load started: {}", url),
            LoadStage::Finished => {
                log::info!("load finished: {}", url);
                if let Some(script) = ctx.config.diagnostics.on_load_script.clone() {
                    ctx.evaluate_script_and_log(&script);
                }
            }
        }
    }
    Propagation::Proceed
}
