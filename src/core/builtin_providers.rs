//! Built-in provider catalog
//!
//! The catalog is embedded from `builtins/providers.toml` at build time so
//! the binary never depends on files next to it.

use serde::Deserialize;

use crate::core::providers::ProviderProfile;

#[derive(Debug, Deserialize)]
struct BuiltinProvidersConfig {
    providers: Vec<ProviderProfile>,
}

/// Load built-in providers from the embedded configuration, in catalog order.
pub fn load_builtin_providers() -> Vec<ProviderProfile> {
    const CONFIG_CONTENT: &str = include_str!("../builtins/providers.toml");

    let config: BuiltinProvidersConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtins/providers.toml");

    config.providers
}

/// Find a built-in provider by ID (case-insensitive)
pub fn find_builtin_provider(id: &str) -> Option<ProviderProfile> {
    load_builtin_providers()
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
}
