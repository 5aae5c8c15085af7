use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable holding the Gemini API key (highest priority).
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Name of the plain-text config file looked up beside the executable.
pub const CONFIG_FILENAME: &str = "config.txt";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing Gemini API key.\n\nSet {API_KEY_ENV} in your environment, or create a file \
         named '{CONFIG_FILENAME}' next to the executable containing the line:\n\n\
         {API_KEY_ENV}=your_api_key_here"
    )]
    MissingApiKey,
}

/// Resolved runtime configuration, built once at startup and passed to each
/// component at construction. Nothing in the pipeline reads the process
/// environment after this point.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"***")
            .finish()
    }
}

impl Config {
    /// Resolve the API key with priority: (1) the `GEMINI_API_KEY` environment
    /// variable, (2) a `config.txt` beside the executable. Absence of both is
    /// a fatal startup condition.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(
            std::env::var(API_KEY_ENV).ok(),
            config_path().as_deref(),
        )
    }

    /// Resolution logic split out from the ambient environment so tests can
    /// drive it without mutating process state.
    pub fn load_with(
        env_key: Option<String>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(key) = env_key {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(Self {
                    api_key: key.to_string(),
                });
            }
        }
        if let Some(key) = config_file.and_then(key_from_file) {
            return Ok(Self { api_key: key });
        }
        Err(ConfigError::MissingApiKey)
    }
}

/// Path of the config file beside the current executable, if resolvable.
pub fn config_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(CONFIG_FILENAME))
}

/// Read the API key from a `KEY=value` config file. Returns `None` if the
/// file doesn't exist or contains no key. Blank lines and `#` comments are
/// skipped; the key name is matched case-insensitively.
fn key_from_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, value)) = line.split_once('=') {
            if name.trim().eq_ignore_ascii_case(API_KEY_ENV) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
