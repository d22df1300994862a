use std::error::Error;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::app::{App, AppOptions};
use crate::core::chat_stream::StreamSettings;
use crate::core::config::Config;
use crate::core::credentials::Credentials;
use crate::core::providers::ProviderRegistry;

/// Startup choices made on the command line. Each one beats the matching
/// config value when present.
#[derive(Debug, Clone, Default)]
pub struct StartupOverrides {
    pub provider: Option<String>,
    pub theme: Option<String>,
    pub env_file: Option<PathBuf>,
}

/// Build the application state before the terminal is taken over, so any
/// failure can still be reported on stderr.
pub fn bootstrap_app(config: &Config, overrides: StartupOverrides) -> Result<App, Box<dyn Error>> {
    let providers = apply_model_overrides(ProviderRegistry::builtin(), config);

    let env_file = overrides
        .env_file
        .unwrap_or_else(|| config.env_file.clone());
    let credentials = Credentials::load(&providers, &env_file)?;

    let stream_settings = StreamSettings::new(config.request_timeout(), config.max_tokens)?;

    let options = AppOptions {
        providers,
        credentials,
        preferred_provider: overrides.provider.or_else(|| config.default_provider.clone()),
        theme: overrides.theme.or_else(|| config.theme.clone()),
        stream_settings,
    };
    let app = App::new(options);
    info!(
        provider = app.session.active_provider(),
        available = app.available_providers.len(),
        "Application ready"
    );
    Ok(app)
}

/// Swap in the configured model for every provider listed under
/// `[default_models]`.
pub fn apply_model_overrides(registry: ProviderRegistry, config: &Config) -> ProviderRegistry {
    let profiles = registry
        .profiles()
        .iter()
        .cloned()
        .map(|mut profile| {
            if let Some(model) = config.model_override(&profile.id) {
                debug!(provider = %profile.id, model, "Using configured model");
                profile.model = model.to_string();
            }
            profile
        })
        .collect();
    ProviderRegistry::from_profiles(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::utils::test_utils::test_profile;
    use tempfile::TempDir;

    #[test]
    fn model_overrides_replace_catalog_models() {
        let registry = ProviderRegistry::from_profiles(vec![test_profile("a"), test_profile("b")]);
        let mut config = Config::default();
        config
            .default_models
            .insert("b".to_string(), "custom-model".to_string());

        let registry = apply_model_overrides(registry, &config);
        assert_eq!(registry.get("a").map(|p| p.model.as_str()), Some("model-a"));
        assert_eq!(
            registry.get("b").map(|p| p.model.as_str()),
            Some("custom-model")
        );
    }

    #[test]
    fn command_line_theme_beats_config() {
        let dir = TempDir::new().expect("tempdir");
        let config = Config {
            theme: Some("ocean".to_string()),
            env_file: dir.path().join("missing.env"),
            ..Config::default()
        };

        let app = bootstrap_app(
            &config,
            StartupOverrides {
                theme: Some("forest".to_string()),
                ..StartupOverrides::default()
            },
        )
        .expect("bootstrap");
        assert_eq!(app.ui.theme_id, "forest");

        let app = bootstrap_app(&config, StartupOverrides::default()).expect("bootstrap");
        assert_eq!(app.ui.theme_id, "ocean");
    }
}
