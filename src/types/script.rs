use log::Level;
use serde_json::Value;

use super::errors::ScriptError;

/// Warning logged when a script completes with anything but a string.
pub const UNEXPECTED_RESULT_MESSAGE: &str = "Error running javascript: unexpected return value";

/// Tagged result of one script evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutcome {
    /// The script evaluated to a string.
    Text(String),
    /// The engine reported an exception; no result is available.
    Failure(ScriptError),
    /// The script evaluated to a non-string value.
    Unexpected(Value),
}

impl ScriptOutcome {
    /// Level and message this outcome is logged with.
    pub fn log_record(&self) -> (Level, String) {
        match self {
            ScriptOutcome::Text(text) => (Level::Info, text.clone()),
            ScriptOutcome::Failure(err) => {
                (Level::Warn, format!("Error running javascript: {}", err))
            }
            ScriptOutcome::Unexpected(_) => (Level::Warn, UNEXPECTED_RESULT_MESSAGE.to_string()),
        }
    }

    pub fn log(&self) {
        let (level, message) = self.log_record();
        log::log!(target: "npc_shell::script", level, "{}", message);
    }
}
