use std::fmt;

// === ShellError ===

/// Errors raised while building or driving the application shell.
#[derive(Debug)]
pub enum ShellError {
    /// The toolkit could not create the top-level window.
    WindowCreation(String),
    /// The web surface could not be created or attached.
    SurfaceCreation(String),
    /// The navigation request was rejected by the web surface.
    Navigation(String),
    /// A script could not be submitted to the web surface.
    Script(String),
    /// The operation is not valid in the current lifecycle phase.
    InvalidPhase(String),
    /// The shell configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::WindowCreation(msg) => write!(f, "Failed to create window: {}", msg),
            ShellError::SurfaceCreation(msg) => {
                write!(f, "Failed to create web surface: {}", msg)
            }
            ShellError::Navigation(msg) => write!(f, "Navigation failed: {}", msg),
            ShellError::Script(msg) => write!(f, "Script submission failed: {}", msg),
            ShellError::InvalidPhase(msg) => write!(f, "Invalid shell phase: {}", msg),
            ShellError::Config(err) => write!(f, "Shell configuration error: {}", err),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::Config(err)
    }
}

// === ConfigError ===

/// Errors related to loading, saving and validating the shell configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the config file.
    IoError(String),
    /// Failed to serialize or deserialize the configuration.
    SerializationError(String),
    /// The provided config key does not exist.
    InvalidKey(String),
    /// The provided config value is invalid.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::SerializationError(msg) => {
                write!(f, "Config serialization error: {}", msg)
            }
            ConfigError::InvalidKey(key) => write!(f, "Invalid config key: {}", key),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// === ScriptError ===

/// Errors reported back from an asynchronous script evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// The script engine reported an exception or evaluation failure.
    Engine(String),
    /// The completion payload could not be decoded.
    MalformedResult(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Engine(msg) => write!(f, "{}", msg),
            ScriptError::MalformedResult(raw) => {
                write!(f, "Malformed script result: {}", raw)
            }
        }
    }
}

impl std::error::Error for ScriptError {}

// === ChannelError ===

/// Errors related to messages arriving over the page IPC bridge.
#[derive(Debug)]
pub enum ChannelError {
    /// The envelope is not valid JSON or has an unknown shape.
    MalformedEnvelope(String),
    /// The message names a channel that was never registered.
    UnknownChannel(String),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::MalformedEnvelope(msg) => write!(f, "Malformed IPC envelope: {}", msg),
            ChannelError::UnknownChannel(name) => write!(f, "Unknown message channel: {}", name),
        }
    }
}

impl std::error::Error for ChannelError {}

// === ThemeError ===

/// Errors related to persisting and applying page-reported theme colors.
#[derive(Debug)]
pub enum ThemeError {
    /// The provided color value is not a hex color.
    InvalidColor(String),
    /// An I/O error occurred while reading or writing the theme file.
    IoError(String),
    /// Failed to serialize or deserialize the theme state.
    SerializationError(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::InvalidColor(color) => write!(f, "Invalid color: {}", color),
            ThemeError::IoError(msg) => write!(f, "Theme I/O error: {}", msg),
            ThemeError::SerializationError(msg) => {
                write!(f, "Theme serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ThemeError {}
