use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Provider to start with when it has a credential (e.g., "openrouter")
    pub default_provider: Option<String>,
    /// UI theme id (e.g., "puku", "ocean", "forest")
    pub theme: Option<String>,
    /// Seconds to wait for the connection and for each chunk of a response
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
    /// Dotenv file consulted for API keys. Relative paths resolve against
    /// the working directory.
    pub env_file: PathBuf,
    /// Model overrides keyed by provider id
    pub default_models: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            theme: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            default_models: HashMap::new(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn model_override(&self, provider_id: &str) -> Option<&str> {
        self.default_models
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(provider_id))
            .map(|(_, model)| model.as_str())
            .filter(|model| !model.trim().is_empty())
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
