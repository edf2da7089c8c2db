//! Host channel dispatch.
//!
//! Structured messages from the page that are not shutdown requests: diagnostic
//! text and theme changes. Everything else is reported and dropped.

use serde_json::Value;

use crate::backend::ShellBackend;
use crate::services::theme_store::{ThemeStore, ThemeStoreTrait};
use crate::types::message::HostMessage;
use crate::types::theme::parse_hex_color;

/// What the dispatcher did with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    Logged,
    ThemeStored,
    /// The page asked for the window to close; the caller owns the window.
    CloseRequested,
    Ignored,
}

/// Handles one host-channel body against the theme store and backend.
pub fn dispatch<B: ShellBackend>(body: &Value, theme: &mut ThemeStore, backend: &mut B) -> HostAction {
    match HostMessage::from_body(body) {
        HostMessage::Text(text) => {
            log::debug!(target: "npc_shell::page", "{}", text);
            HostAction::Logged
        }
        HostMessage::ThemeChanged(change) => {
            theme.apply(&change);
            if let Err(e) = theme.save() {
                log::warn!("failed to save theme: {}", e);
            }
            if let Some(hex) = change.background.as_deref() {
                match parse_hex_color(hex) {
                    Ok(color) => {
                        if let Err(e) = backend.set_background(color) {
                            log::warn!("failed to apply background {}: {}", hex, e);
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                }
            }
            log::info!(
                "theme changed to {}",
                change.theme_type.as_deref().unwrap_or("unknown")
            );
            HostAction::ThemeStored
        }
        HostMessage::CloseInstance => HostAction::CloseRequested,
        // Unknown commands are dropped quietly; only non-object bodies are reported.
        HostMessage::Unrecognized(other) => {
            if !other.is_object() {
                log::debug!("Cannot handle message from webapp");
            }
            HostAction::Ignored
        }
    }
}
