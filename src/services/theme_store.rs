//! Theme store for the NPC shell.
//!
//! Keeps the theme colors the page last reported so the next launch can paint
//! the window background before the page has loaded.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::ThemeError;
use crate::types::message::ThemeChange;
use crate::types::theme::{parse_hex_color, Rgba, ThemeState};

/// Trait defining theme persistence operations.
pub trait ThemeStoreTrait {
    fn load(&mut self) -> Result<&ThemeState, ThemeError>;
    fn save(&self) -> Result<(), ThemeError>;
    fn state(&self) -> &ThemeState;
    /// Merges a change into the stored state. Fields the page did not send are kept.
    fn apply(&mut self, change: &ThemeChange);
    /// The stored background as RGBA, if one is set and valid.
    fn background(&self) -> Option<Rgba>;
}

pub struct ThemeStore {
    path: PathBuf,
    state: ThemeState,
}

impl ThemeStore {
    /// Uses `theme.json` in the platform data directory unless `path_override` is set.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let path = path_override.unwrap_or_else(|| platform::get_data_dir().join("theme.json"));
        Self {
            path,
            state: ThemeState::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStoreTrait for ThemeStore {
    fn load(&mut self) -> Result<&ThemeState, ThemeError> {
        if !self.path.exists() {
            self.state = ThemeState::default();
            return Ok(&self.state);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ThemeError::IoError(format!("Failed to read theme file: {}", e)))?;
        self.state = serde_json::from_str(&content)
            .map_err(|e| ThemeError::SerializationError(e.to_string()))?;
        Ok(&self.state)
    }

    fn save(&self) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ThemeError::IoError(format!("Failed to create data directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.state)
            .map_err(|e| ThemeError::SerializationError(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| ThemeError::IoError(format!("Failed to write theme file: {}", e)))
    }

    fn state(&self) -> &ThemeState {
        &self.state
    }

    fn apply(&mut self, change: &ThemeChange) {
        if let Some(kind) = &change.theme_type {
            self.state.theme_type = Some(kind.clone());
        }
        if let Some(bg) = &change.background {
            self.state.background = Some(bg.clone());
        }
        if let Some(fg) = &change.foreground {
            self.state.foreground = Some(fg.clone());
        }
    }

    fn background(&self) -> Option<Rgba> {
        let hex = self.state.background.as_deref()?;
        match parse_hex_color(hex) {
            Ok(color) => Some(color),
            Err(e) => {
                log::warn!("ignoring stored background: {}", e);
                None
            }
        }
    }
}
