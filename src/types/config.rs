use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Top-level shell configuration.
///
/// Every field defaults to the literal the shell used before it had a config file,
/// so a missing or partial `shell.json` behaves like the fixed build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    pub application_id: String,
    pub window: WindowConfig,
    pub url: String,
    pub channels: ChannelConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            application_id: "org.npc.shell".to_string(),
            window: WindowConfig::default(),
            url: "http://localhost:3000/".to_string(),
            channels: ChannelConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Checks the invariants the shell relies on before it builds anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "application_id cannot be empty".to_string(),
            ));
        }
        if self.window.title.is_empty() {
            return Err(ConfigError::InvalidValue(
                "window.title cannot be empty".to_string(),
            ));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!(
                "url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.channels.command.is_empty() {
            return Err(ConfigError::InvalidValue(
                "channels.command cannot be empty".to_string(),
            ));
        }
        if let Some(host) = &self.channels.host {
            if host.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "channels.host cannot be empty".to_string(),
                ));
            }
            if *host == self.channels.command {
                return Err(ConfigError::InvalidValue(format!(
                    "channels.host and channels.command must differ, both are '{}'",
                    host
                )));
            }
        }
        // The web view only injects the bridge into the page's main world.
        if self.channels.script_world != "main" {
            return Err(ConfigError::InvalidValue(format!(
                "unsupported script world '{}'",
                self.channels.script_world
            )));
        }
        Ok(())
    }

    /// All channel names the page may post to, command channel first.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names = vec![self.channels.command.clone()];
        if let Some(host) = &self.channels.host {
            names.push(host.clone());
        }
        names
    }
}

/// Initial window geometry and title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "NPC".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Names of the page-to-native message channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    /// Any message on this channel closes the window.
    pub command: String,
    pub script_world: String,
    /// Structured messages (diagnostic text, theme changes). `None` disables it.
    pub host: Option<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command: "command".to_string(),
            script_world: "main".to_string(),
            host: Some("hostChannel".to_string()),
        }
    }
}

/// Developer-facing switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub devtools: bool,
    /// Evaluated (and its result logged) each time a page finishes loading.
    pub on_load_script: Option<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
            on_load_script: None,
        }
    }
}
