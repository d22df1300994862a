//! API key resolution.
//!
//! Keys come from a dotenv-style file and from the process environment. The
//! environment wins when both define the same variable. Empty values are
//! treated as absent so a blank `OPENAI_API_KEY=` line does not make a
//! provider look configured.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::providers::ProviderRegistry;

#[derive(Debug, Default, Clone)]
pub struct Credentials {
    keys: HashMap<String, String>,
}

#[derive(Debug)]
pub enum CredentialError {
    Read { path: PathBuf, source: dotenvy::Error },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Read { path, source } => {
                write!(f, "Failed to read env file at {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CredentialError::Read { source, .. } => Some(source),
        }
    }
}

impl Credentials {
    /// Stores `key` for `provider_id`. Empty keys are ignored.
    pub fn insert(&mut self, provider_id: &str, key: impl Into<String>) {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        self.keys.insert(provider_id.to_string(), key.to_string());
    }

    pub fn get(&self, provider_id: &str) -> Option<&str> {
        self.keys.get(provider_id).map(String::as_str)
    }

    pub fn has(&self, provider_id: &str) -> bool {
        self.keys.contains_key(provider_id)
    }

    /// Reads `env_file` (a missing file is fine) and the process environment.
    pub fn load(registry: &ProviderRegistry, env_file: &Path) -> Result<Self, CredentialError> {
        let file_vars = read_env_file(env_file)?;
        Ok(Self::from_sources(registry, &file_vars, |name| {
            std::env::var(name).ok()
        }))
    }

    pub fn from_sources<F>(
        registry: &ProviderRegistry,
        file_vars: &HashMap<String, String>,
        env_lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut credentials = Self::default();
        for profile in registry.profiles() {
            let from_env = env_lookup(&profile.env_var).filter(|v| !v.trim().is_empty());
            let value = from_env.or_else(|| file_vars.get(&profile.env_var).cloned());
            if let Some(value) = value {
                credentials.insert(&profile.id, value);
            }
        }
        debug!(configured = credentials.keys.len(), "Resolved provider credentials");
        credentials
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, CredentialError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => {
            debug!(path = %path.display(), "No env file found");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(CredentialError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(err) => warn!(path = %path.display(), error = %err, "Skipping malformed env line"),
        }
    }
    Ok(vars)
}
