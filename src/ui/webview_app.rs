//! Native window + web view backend using `wry` + `tao`.
//!
//! Architecture:
//! - The event loop carries `Signal`s as user events. IPC and page-load callbacks
//!   from the web view post into it through an `EventLoopProxy`, so every signal
//!   reaches the shell on the loop thread, in order.
//! - `with_initialization_script(bridge_script(..))` gives every page its message
//!   channels and routes `window.close()` to native code.
//! - Activation runs before the loop starts, while the backend still owns the
//!   event loop it needs to build the window; `start` then takes the loop back and
//!   runs it with `run_return` so the exit code reaches the caller.

use std::sync::Mutex;

use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::platform::run_return::EventLoopExtRunReturn;
use tao::window::{Window, WindowBuilder};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::app::{AppShell, ShellPhase};
use crate::backend::{ScriptCallback, ShellBackend, SurfaceSpec, WindowSpec};
use crate::services::config_engine;
use crate::services::script_bridge::{bridge_script, route_ipc};
use crate::services::theme_store::ThemeStore;
use crate::types::errors::ShellError;
use crate::types::signal::{LoadStage, Signal};
use crate::types::theme::Rgba;

/// Exit code when the shell cannot be constructed at all.
const STARTUP_FAILURE_EXIT_CODE: i32 = 1;

pub struct WebViewBackend {
    /// Held until `start` runs it; window creation needs it before that.
    event_loop: Option<EventLoop<Signal>>,
    proxy: EventLoopProxy<Signal>,
    window: Option<Window>,
    /// Configured surface, built against the window by `attach_surface`.
    pending_surface: Option<WebViewBuilder<'static>>,
    webview: Option<WebView>,
}

impl WebViewBackend {
    pub fn new(application_id: &str) -> Self {
        let mut builder = EventLoopBuilder::<Signal>::with_user_event();

        #[cfg(target_os = "linux")]
        {
            use tao::platform::unix::EventLoopBuilderExtUnix;
            builder.with_app_id(application_id);
        }
        #[cfg(not(target_os = "linux"))]
        let _ = application_id;

        let event_loop = builder.build();
        let proxy = event_loop.create_proxy();
        Self {
            event_loop: Some(event_loop),
            proxy,
            window: None,
            pending_surface: None,
            webview: None,
        }
    }

    fn take_event_loop(&mut self) -> Option<EventLoop<Signal>> {
        self.event_loop.take()
    }

    fn release(&mut self) {
        // Surface first: it is the window's child.
        self.pending_surface = None;
        self.webview = None;
        self.window = None;
    }
}

/// Posts a web view callback into the event loop. Fails only once the loop has exited.
fn forward(proxy: &EventLoopProxy<Signal>, signal: Signal) {
    let name = signal.detailed_name();
    if proxy.send_event(signal).is_err() {
        log::debug!("event loop closed, dropping {}", name);
    }
}

impl ShellBackend for WebViewBackend {
    fn create_window(&mut self, spec: &WindowSpec) -> Result<(), ShellError> {
        let event_loop = self.event_loop.as_ref().ok_or_else(|| {
            ShellError::WindowCreation("event loop is already running".to_string())
        })?;

        let window = WindowBuilder::new()
            .with_title(&spec.title)
            .with_inner_size(LogicalSize::new(spec.width as f64, spec.height as f64))
            .with_visible(false)
            .build(event_loop)
            .map_err(|e| ShellError::WindowCreation(e.to_string()))?;

        self.window = Some(window);
        Ok(())
    }

    fn create_surface(&mut self, spec: &SurfaceSpec) -> Result<(), ShellError> {
        let ipc_proxy = self.proxy.clone();
        let load_proxy = self.proxy.clone();
        let channels = spec.channels.clone();
        let bridge = bridge_script(&spec.channels);

        let mut builder = WebViewBuilder::new()
            .with_initialization_script(bridge.as_str())
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                match route_ipc(request.body(), &channels) {
                    Ok(signal) => forward(&ipc_proxy, signal),
                    Err(e) => log::warn!("{}", e),
                }
            })
            .with_on_page_load_handler(move |event, url| {
                let stage = match event {
                    PageLoadEvent::Started => LoadStage::Started,
                    PageLoadEvent::Finished => LoadStage::Finished,
                };
                forward(&load_proxy, Signal::LoadChanged { stage, url });
            })
            .with_devtools(spec.devtools);

        if let Some(color) = spec.background {
            builder = builder.with_background_color(color);
        }

        self.pending_surface = Some(builder);
        Ok(())
    }

    fn attach_surface(&mut self) -> Result<(), ShellError> {
        if self.webview.is_some() {
            return Err(ShellError::SurfaceCreation(
                "window already has a child".to_string(),
            ));
        }
        let builder = self.pending_surface.take().ok_or_else(|| {
            ShellError::SurfaceCreation("no surface has been created".to_string())
        })?;
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| ShellError::SurfaceCreation("no window to attach to".to_string()))?;

        #[cfg(target_os = "linux")]
        let webview = {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            let vbox = window.default_vbox().ok_or_else(|| {
                ShellError::SurfaceCreation("window has no GTK container".to_string())
            })?;
            builder.build_gtk(vbox)
        };

        #[cfg(not(target_os = "linux"))]
        let webview = builder.build(window);

        self.webview = Some(webview.map_err(|e| ShellError::SurfaceCreation(e.to_string()))?);
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), ShellError> {
        let webview = self
            .webview
            .as_ref()
            .ok_or_else(|| ShellError::Navigation("no web surface".to_string()))?;
        webview
            .load_url(url)
            .map_err(|e| ShellError::Navigation(e.to_string()))
    }

    fn show(&mut self) {
        if let Some(window) = &self.window {
            window.set_visible(true);
        }
    }

    fn destroy_window(&mut self) {
        self.release();
    }

    fn quit(&mut self, exit_code: i32) {
        log::debug!("releasing window before exit ({})", exit_code);
        self.release();
    }

    fn evaluate_script(&mut self, script: &str, callback: ScriptCallback) -> Result<(), ShellError> {
        let webview = self
            .webview
            .as_ref()
            .ok_or_else(|| ShellError::Script("no web surface".to_string()))?;

        // wry wants `Fn`; the slot makes sure the completion runs once.
        let slot = Mutex::new(Some(callback));
        webview
            .evaluate_script_with_callback(script, move |raw: String| {
                let callback = slot.lock().ok().and_then(|mut pending| pending.take());
                if let Some(callback) = callback {
                    callback(Ok(raw));
                }
            })
            .map_err(|e| ShellError::Script(e.to_string()))
    }

    fn set_background(&mut self, color: Rgba) -> Result<(), ShellError> {
        let webview = self
            .webview
            .as_ref()
            .ok_or_else(|| ShellError::SurfaceCreation("no web surface".to_string()))?;
        webview
            .set_background_color(color)
            .map_err(|e| ShellError::SurfaceCreation(e.to_string()))
    }
}

// ─── Main entry point ───

/// Runs the shell until its window is gone. Returns the event loop's exit code.
pub fn start(args: Vec<String>) -> i32 {
    let config = config_engine::load_startup_config();
    let backend = WebViewBackend::new(&config.application_id);

    let mut shell = match AppShell::new(config, backend, ThemeStore::new(None)) {
        Ok(shell) => shell,
        Err(e) => {
            log::error!("{}", e);
            return STARTUP_FAILURE_EXIT_CODE;
        }
    };

    if let Err(e) = shell.start(&args) {
        log::error!("{}", e);
        return STARTUP_FAILURE_EXIT_CODE;
    }
    if shell.phase() == ShellPhase::Terminated {
        return shell.exit_code();
    }

    let mut event_loop = match shell.context_mut().backend_mut().take_event_loop() {
        Some(event_loop) => event_loop,
        None => {
            log::error!("event loop missing after activation");
            return STARTUP_FAILURE_EXIT_CODE;
        }
    };

    event_loop.run_return(|event, _target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                shell.dispatch(Signal::WindowCloseRequested);
            }
            // The shell raises its own `destroy` when it drops the window.
            Event::UserEvent(signal) => {
                shell.dispatch(signal);
            }
            _ => {}
        }

        if shell.phase() == ShellPhase::Terminated {
            *control_flow = ControlFlow::ExitWithCode(shell.exit_code());
        }
    })
}
