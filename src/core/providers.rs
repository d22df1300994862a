use std::error::Error;
use std::fmt;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::api::ChatMessage;
use crate::core::builtin_providers::load_builtin_providers;
use crate::core::chat_stream::{StreamParams, StreamSettings};
use crate::core::credentials::Credentials;

/// Connection profile for one provider. Profiles are read-only once the
/// registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    pub display_name: String,
    pub base_url: String,
    pub model: String,
    /// Environment variable (or dotenv key) holding the credential.
    pub env_var: String,
}

impl ProviderProfile {
    /// Human-facing name used in notices, e.g. `OpenRouter (openrouter)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.id)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    Unknown(String),
    MissingCredential { provider: String, env_var: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unknown(id) => write!(f, "Unknown provider: {id}"),
            ProviderError::MissingCredential { provider, env_var } => write!(
                f,
                "No API key configured for {provider}. Set {env_var} in the environment or .env file."
            ),
        }
    }
}

impl Error for ProviderError {}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    profiles: Vec<ProviderProfile>,
}

impl ProviderRegistry {
    pub fn builtin() -> Self {
        Self::from_profiles(load_builtin_providers())
    }

    pub fn from_profiles(profiles: Vec<ProviderProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[ProviderProfile] {
        &self.profiles
    }

    pub fn get(&self, id: &str) -> Option<&ProviderProfile> {
        self.profiles.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    /// Ids of providers that have a credential, in catalog order.
    pub fn available(&self, credentials: &Credentials) -> Vec<String> {
        self.profiles
            .iter()
            .filter(|p| credentials.has(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Label for `id`, falling back to the raw id for unknown providers.
    pub fn label(&self, id: &str) -> String {
        self.get(id)
            .map(ProviderProfile::label)
            .unwrap_or_else(|| id.to_string())
    }

    /// Resolve everything a streaming task needs for one request to
    /// `provider_id`.
    pub fn prepare_stream(
        &self,
        provider_id: &str,
        credentials: &Credentials,
        api_messages: Vec<ChatMessage>,
        settings: &StreamSettings,
        stream_id: u64,
    ) -> Result<StreamParams, ProviderError> {
        let profile = self
            .get(provider_id)
            .ok_or_else(|| ProviderError::Unknown(provider_id.to_string()))?;
        let api_key = credentials.get(&profile.id).ok_or_else(|| {
            ProviderError::MissingCredential {
                provider: profile.display_name.clone(),
                env_var: profile.env_var.clone(),
            }
        })?;

        Ok(StreamParams {
            client: settings.client.clone(),
            url: profile.completions_url(),
            api_key: api_key.to_string(),
            provider_id: profile.id.clone(),
            model: profile.model.clone(),
            api_messages,
            max_tokens: settings.max_tokens,
            timeout: settings.timeout,
            cancel_token: CancellationToken::new(),
            stream_id,
        })
    }
}
