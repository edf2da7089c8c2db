//! Toolkit seam for the NPC shell.
//!
//! `ShellBackend` is everything the shell needs from a windowing toolkit and a web
//! engine. The `gui` feature provides the `tao` + `wry` implementation in
//! `ui::webview_app`; `HeadlessBackend` records the calls instead of drawing.

pub mod headless;

use crate::types::errors::ShellError;
use crate::types::theme::Rgba;

pub use headless::{BackendAction, HeadlessBackend};

/// Parameters for the top-level window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Parameters for the embedded web surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    /// Channel names exposed to page script.
    pub channels: Vec<String>,
    pub devtools: bool,
    pub background: Option<Rgba>,
}

/// Raw completion of a script: the JSON-encoded value, or the engine's error text.
pub type RawScriptResult = Result<String, String>;

/// Called exactly once, on the loop thread, when a script finishes.
pub type ScriptCallback = Box<dyn FnOnce(RawScriptResult) + Send + 'static>;

/// Window and web-surface operations, invoked only from the event-loop thread.
pub trait ShellBackend {
    fn create_window(&mut self, spec: &WindowSpec) -> Result<(), ShellError>;
    fn create_surface(&mut self, spec: &SurfaceSpec) -> Result<(), ShellError>;
    /// Makes the surface the window's only child.
    fn attach_surface(&mut self) -> Result<(), ShellError>;
    /// Starts an asynchronous page load.
    fn navigate(&mut self, url: &str) -> Result<(), ShellError>;
    fn show(&mut self);
    /// Destroys the window and, with it, the surface.
    fn destroy_window(&mut self);
    /// Asks the event loop to stop with `exit_code`.
    fn quit(&mut self, exit_code: i32);
    fn evaluate_script(&mut self, script: &str, callback: ScriptCallback) -> Result<(), ShellError>;
    fn set_background(&mut self, color: Rgba) -> Result<(), ShellError>;
}
