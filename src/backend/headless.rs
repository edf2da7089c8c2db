//! Backend without a display.
//!
//! Records every call in order and completes script evaluations from a queue of
//! canned results when `flush_scripts` runs, which stands in for the loop
//! delivering completions on a later iteration.

use std::collections::VecDeque;

use super::{RawScriptResult, ScriptCallback, ShellBackend, SurfaceSpec, WindowSpec};
use crate::types::errors::ShellError;
use crate::types::theme::Rgba;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendAction {
    CreateWindow(WindowSpec),
    CreateSurface(SurfaceSpec),
    AttachSurface,
    Navigate(String),
    Show,
    DestroyWindow,
    Quit(i32),
    EvaluateScript(String),
    SetBackground(Rgba),
}

#[derive(Default)]
pub struct HeadlessBackend {
    actions: Vec<BackendAction>,
    window: bool,
    surface_created: bool,
    surface_attached: bool,
    fail_window: Option<String>,
    script_results: VecDeque<RawScriptResult>,
    pending_scripts: Vec<ScriptCallback>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create_window` fail with `reason`.
    pub fn fail_window_creation(&mut self, reason: &str) {
        self.fail_window = Some(reason.to_string());
    }

    /// Queues the raw result the next evaluated script completes with.
    /// Scripts with nothing queued complete with `null`.
    pub fn push_script_result(&mut self, result: RawScriptResult) {
        self.script_results.push_back(result);
    }

    /// Runs every pending script completion. Returns how many ran.
    pub fn flush_scripts(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_scripts);
        let count = pending.len();
        for callback in pending {
            let result = self
                .script_results
                .pop_front()
                .unwrap_or_else(|| Ok("null".to_string()));
            callback(result);
        }
        count
    }

    pub fn actions(&self) -> &[BackendAction] {
        &self.actions
    }

    pub fn count(&self, matches: impl Fn(&BackendAction) -> bool) -> usize {
        self.actions.iter().filter(|a| matches(a)).count()
    }

    pub fn has_window(&self) -> bool {
        self.window
    }

    pub fn surface_attached(&self) -> bool {
        self.surface_attached
    }
}

impl ShellBackend for HeadlessBackend {
    fn create_window(&mut self, spec: &WindowSpec) -> Result<(), ShellError> {
        if let Some(reason) = self.fail_window.take() {
            return Err(ShellError::WindowCreation(reason));
        }
        self.actions.push(BackendAction::CreateWindow(spec.clone()));
        self.window = true;
        Ok(())
    }

    fn create_surface(&mut self, spec: &SurfaceSpec) -> Result<(), ShellError> {
        self.actions.push(BackendAction::CreateSurface(spec.clone()));
        self.surface_created = true;
        Ok(())
    }

    fn attach_surface(&mut self) -> Result<(), ShellError> {
        if !self.window || !self.surface_created {
            return Err(ShellError::SurfaceCreation(
                "surface attached before window and surface exist".to_string(),
            ));
        }
        if self.surface_attached {
            return Err(ShellError::SurfaceCreation(
                "window already has a child".to_string(),
            ));
        }
        self.actions.push(BackendAction::AttachSurface);
        self.surface_attached = true;
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), ShellError> {
        if !self.surface_attached {
            return Err(ShellError::Navigation("no surface".to_string()));
        }
        self.actions.push(BackendAction::Navigate(url.to_string()));
        Ok(())
    }

    fn show(&mut self) {
        self.actions.push(BackendAction::Show);
    }

    fn destroy_window(&mut self) {
        self.actions.push(BackendAction::DestroyWindow);
        self.window = false;
        self.surface_attached = false;
        // Pending completions die with the surface.
        self.pending_scripts.clear();
    }

    fn quit(&mut self, exit_code: i32) {
        self.actions.push(BackendAction::Quit(exit_code));
    }

    fn evaluate_script(&mut self, script: &str, callback: ScriptCallback) -> Result<(), ShellError> {
        if !self.surface_attached {
            return Err(ShellError::Script("no surface".to_string()));
        }
        self.actions.push(BackendAction::EvaluateScript(script.to_string()));
        self.pending_scripts.push(callback);
        Ok(())
    }

    fn set_background(&mut self, color: Rgba) -> Result<(), ShellError> {
        self.actions.push(BackendAction::SetBackground(color));
        Ok(())
    }
}
