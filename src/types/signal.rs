use serde_json::Value;

/// Events the shell reacts to, all delivered on the event-loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The application is starting its event loop.
    Activate,
    /// The user asked the window manager to close the window.
    WindowCloseRequested,
    /// The top-level window has been destroyed.
    WindowDestroyed,
    /// The page asked its web surface to close (`window.close()`).
    SurfaceCloseRequested,
    /// The page posted a message on a named channel.
    ScriptMessage { channel: String, body: Value },
    /// Page load progress.
    LoadChanged { stage: LoadStage, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Started,
    Finished,
}

pub const ACTIVATE: &str = "activate";
pub const DELETE_EVENT: &str = "delete-event";
pub const DESTROY: &str = "destroy";
pub const CLOSE: &str = "close";
pub const SCRIPT_MESSAGE_RECEIVED: &str = "script-message-received";
pub const LOAD_CHANGED: &str = "load-changed";

impl Signal {
    /// The signal name without detail, e.g. `script-message-received`.
    pub fn base_name(&self) -> &'static str {
        match self {
            Signal::Activate => ACTIVATE,
            Signal::WindowCloseRequested => DELETE_EVENT,
            Signal::WindowDestroyed => DESTROY,
            Signal::SurfaceCloseRequested => CLOSE,
            Signal::ScriptMessage { .. } => SCRIPT_MESSAGE_RECEIVED,
            Signal::LoadChanged { .. } => LOAD_CHANGED,
        }
    }

    /// The full name including detail, e.g. `script-message-received::command`.
    pub fn detailed_name(&self) -> String {
        match self {
            Signal::ScriptMessage { channel, .. } => script_message_signal(channel),
            other => other.base_name().to_string(),
        }
    }

    /// Whether a handler connected under `name` should receive this signal.
    pub fn matches(&self, name: &str) -> bool {
        name == self.base_name() || name == self.detailed_name()
    }
}

/// Detailed signal name for messages on `channel`.
pub fn script_message_signal(channel: &str) -> String {
    format!("{}::{}", SCRIPT_MESSAGE_RECEIVED, channel)
}

/// Handler verdict; `Stop` means the signal was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Proceed,
}

impl Propagation {
    pub fn is_handled(self) -> bool {
        self == Propagation::Stop
    }
}
