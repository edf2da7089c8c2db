use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ChannelError;

/// Wire format posted by the bridge script through `window.ipc.postMessage`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IpcEnvelope {
    /// `window.webkit.messageHandlers[channel].postMessage(body)`
    Message {
        channel: String,
        #[serde(default)]
        body: Value,
    },
    /// `window.close()`
    Close,
}

impl IpcEnvelope {
    pub fn parse(raw: &str) -> Result<Self, ChannelError> {
        serde_json::from_str(raw).map_err(|e| ChannelError::MalformedEnvelope(e.to_string()))
    }
}

/// A message on the host channel, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// Plain text, mostly page-side debugging output.
    Text(String),
    ThemeChanged(ThemeChange),
    /// `{"command":"closeInstance"}`: the page asks the shell to close its window.
    CloseInstance,
    Unrecognized(Value),
}

/// Host command asking the shell to close the window.
pub const CLOSE_INSTANCE_COMMAND: &str = "closeInstance";

/// Colors the page reports when its theme switches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeChange {
    /// `"dark"`, `"light"`, ...
    pub theme_type: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// Color key the page uses for the surface behind its tab strip.
pub const BACKGROUND_COLOR_KEY: &str = "editorGroupHeader.tabsBackground";
pub const FOREGROUND_COLOR_KEY: &str = "foreground";

impl HostMessage {
    /// Classifies a host-channel body.
    ///
    /// Theme changes look like
    /// `{"type":"themeChanged","values":{"type":"dark","values":{"colors":{..}}}}`.
    pub fn from_body(body: &Value) -> Self {
        if let Some(text) = body.as_str() {
            return HostMessage::Text(text.to_string());
        }

        if body.get("type").and_then(|v| v.as_str()) == Some("themeChanged") {
            if let Some(change) = body.get("values") {
                let colors = change
                    .get("values")
                    .and_then(|v| v.get("colors"))
                    .and_then(|v| v.as_object());
                let color = |key: &str| {
                    colors
                        .and_then(|c| c.get(key))
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                };
                return HostMessage::ThemeChanged(ThemeChange {
                    theme_type: change
                        .get("type")
                        .and_then(|v| v.as_str())
                        .map(str::to_string),
                    background: color(BACKGROUND_COLOR_KEY),
                    foreground: color(FOREGROUND_COLOR_KEY),
                });
            }
        }

        if body.get("command").and_then(|v| v.as_str()) == Some(CLOSE_INSTANCE_COMMAND) {
            return HostMessage::CloseInstance;
        }

        HostMessage::Unrecognized(body.clone())
    }
}
