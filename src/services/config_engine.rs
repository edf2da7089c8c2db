// NPC shell Config Engine
// Loads the shell configuration from JSON, applies environment overrides,
// updates individual values and resets to the built-in defaults.
// The config file lives at the platform-specific config path.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::platform;
use crate::types::config::ShellConfig;
use crate::types::errors::ConfigError;

/// Prefix of environment variables that override config keys.
pub const ENV_PREFIX: &str = "NPC_SHELL_";

/// Trait defining the config engine interface.
pub trait ConfigEngineTrait {
    fn load(&mut self) -> Result<ShellConfig, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn get_config(&self) -> &ShellConfig;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError>;
    fn apply_env_overrides<I>(&mut self, vars: I) -> Result<usize, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>;
    fn reset(&mut self);
    fn get_config_path(&self) -> &str;
}

/// Config engine backed by a JSON file on disk.
pub struct ConfigEngine {
    config_path: String,
    config: ShellConfig,
}

impl ConfigEngine {
    /// Creates a new ConfigEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `shell.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("shell.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            config: ShellConfig::default(),
        }
    }
}

/// Maps `NPC_SHELL_WINDOW__TITLE` to `window.title`. Returns `None` for other variables.
pub fn env_key(var: &str) -> Option<String> {
    let rest = var.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_lowercase().replace("__", "."))
}

/// Environment values are JSON when they parse as JSON, plain strings otherwise.
fn env_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl ConfigEngineTrait for ConfigEngine {
    /// Loads the config from the JSON file.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    /// Keys absent from the file keep their default values.
    fn load(&mut self) -> Result<ShellConfig, ConfigError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            log::debug!("no config at {}, using defaults", self.config_path);
            self.config = ShellConfig::default();
            return Ok(self.config.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        let config: ShellConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;

        log::info!("loaded config from {}", self.config_path);
        self.config = config;
        Ok(self.config.clone())
    }

    /// Writes the current config to disk, creating parent directories.
    fn save(&self) -> Result<(), ConfigError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_config(&self) -> &ShellConfig {
        &self.config
    }

    /// Updates one value by dot-notation key path, e.g. `window.title`.
    ///
    /// The change is kept in memory only; call `save` to persist it. The key must
    /// already exist and the resulting config must still validate.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::InvalidKey("Key cannot be empty".to_string()));
        }
        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.config).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;

        {
            let (last, path) = match parts.split_last() {
                Some(split) => split,
                None => return Err(ConfigError::InvalidKey(key.to_string())),
            };
            let mut current = &mut json_value;
            for part in path {
                current = current
                    .get_mut(*part)
                    .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;
            }
            match current {
                Value::Object(map) if map.contains_key(*last) => {
                    map.insert(last.to_string(), value);
                }
                _ => return Err(ConfigError::InvalidKey(key.to_string())),
            }
        }

        let new_config: ShellConfig = serde_json::from_value(json_value).map_err(|e| {
            ConfigError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        new_config.validate()?;

        self.config = new_config;
        Ok(())
    }

    /// Applies every `NPC_SHELL_*` variable in `vars`. Returns how many applied.
    ///
    /// A variable that names an unknown key or carries a bad value is logged and
    /// skipped; the others still apply.
    fn apply_env_overrides<I>(&mut self, vars: I) -> Result<usize, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (var, raw) in vars {
            let Some(key) = env_key(&var) else {
                continue;
            };
            let value = env_value(&raw);
            let result = match self.set_value(&key, value.clone()) {
                // `NPC_SHELL_WINDOW__TITLE=2024` is still a title.
                Err(ConfigError::InvalidValue(_)) if !value.is_string() => {
                    self.set_value(&key, Value::String(raw))
                }
                other => other,
            };
            match result {
                Ok(()) => {
                    log::debug!("config override {} from {}", key, var);
                    applied += 1;
                }
                Err(e) => log::warn!("ignoring {}: {}", var, e),
            }
        }
        Ok(applied)
    }

    fn reset(&mut self) {
        self.config = ShellConfig::default();
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

/// Loads the config used at startup: the file (defaults if missing or broken) with
/// the process environment applied on top. Problems are logged, never fatal.
pub fn load_startup_config() -> ShellConfig {
    let mut engine = ConfigEngine::new(None);
    if let Err(e) = engine.load() {
        log::warn!("{}; using defaults", e);
        engine.reset();
    }
    if let Err(e) = engine.apply_env_overrides(std::env::vars()) {
        log::warn!("environment overrides not applied: {}", e);
    }
    engine.get_config().clone()
}
