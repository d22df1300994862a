use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{App, AppEvent, AppOptions};
use crate::core::chat_stream::StreamSettings;
use crate::core::credentials::Credentials;
use crate::core::providers::{ProviderProfile, ProviderRegistry};

pub fn test_profile(id: &str) -> ProviderProfile {
    ProviderProfile {
        id: id.to_string(),
        display_name: id.to_uppercase(),
        base_url: format!("http://127.0.0.1:9/{id}/v1"),
        model: format!("model-{id}"),
        env_var: format!("{}_API_KEY", id.to_uppercase()),
    }
}

pub fn test_settings() -> StreamSettings {
    StreamSettings {
        client: reqwest::Client::new(),
        max_tokens: 100,
        timeout: Duration::from_secs(5),
    }
}

/// Credentials with `key-<id>` for each id.
pub fn test_credentials(ids: &[&str]) -> Credentials {
    let mut credentials = Credentials::default();
    for id in ids {
        credentials.insert(id, format!("key-{id}"));
    }
    credentials
}

pub fn test_app_options(ids: &[&str], credentials: Credentials) -> AppOptions {
    AppOptions {
        providers: ProviderRegistry::from_profiles(ids.iter().map(|id| test_profile(id)).collect()),
        credentials,
        preferred_provider: None,
        theme: None,
        stream_settings: test_settings(),
    }
}

pub fn create_test_app_with(ids: &[&str], credentialed: &[&str]) -> App {
    App::new(test_app_options(ids, test_credentials(credentialed)))
}

/// Providers "a" and "b", both with keys; "a" is active.
pub fn create_test_app() -> App {
    create_test_app_with(&["a", "b"], &["a", "b"])
}

/// Providers "a" and "b" with no keys at all.
pub fn create_unconfigured_app() -> App {
    create_test_app_with(&["a", "b"], &[])
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn press(app: &mut App, code: KeyCode) {
    app.update(AppEvent::Key(key(code)));
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}
