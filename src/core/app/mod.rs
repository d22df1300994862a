use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::chat_stream::StreamSettings;
use crate::core::credentials::Credentials;
use crate::core::providers::ProviderRegistry;
use crate::core::session::Session;
use crate::ui::builtin_themes::{default_theme, find_builtin_theme};
use crate::ui::theme::Theme;

pub mod actions;
pub mod settings;
pub mod ui_state;

pub use actions::{apply_event, AppCommand, AppEvent, EventSink};
pub use ui_state::{BaseMode, ExitChoice, RequestState, UiMode, UiState};

/// Provider used when nothing is configured, so the UI still has a name to
/// show.
pub const FALLBACK_PROVIDER: &str = "openrouter";

/// Everything needed to build an [`App`], resolved by the CLI before the
/// terminal is set up.
pub struct AppOptions {
    pub providers: ProviderRegistry,
    pub credentials: Credentials,
    /// Provider requested by `--provider` or the config file.
    pub preferred_provider: Option<String>,
    pub theme: Option<String>,
    pub stream_settings: StreamSettings,
}

pub struct App {
    pub session: Session,
    pub ui: UiState,
    pub providers: ProviderRegistry,
    pub credentials: Credentials,
    /// Providers with a credential, in catalog order. Fixed after startup.
    pub available_providers: Vec<String>,
    pub stream_settings: StreamSettings,
    last_stream_id: u64,
    stream_cancel: Option<CancellationToken>,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        let AppOptions {
            providers,
            credentials,
            preferred_provider,
            theme,
            stream_settings,
        } = options;

        let available_providers = providers.available(&credentials);
        let active = pick_initial_provider(
            &providers,
            &available_providers,
            preferred_provider.as_deref(),
        );

        let spec = match theme.as_deref() {
            Some(id) => find_builtin_theme(id).unwrap_or_else(|| {
                warn!(theme = id, "Unknown theme, using default");
                default_theme()
            }),
            None => default_theme(),
        };
        let ui = UiState::new(spec.id.clone(), Theme::from_spec(&spec));

        let mut app = Self {
            session: Session::new(active),
            ui,
            providers,
            credentials,
            available_providers,
            stream_settings,
            last_stream_id: 0,
            stream_cancel: None,
        };
        app.add_startup_notice();
        app
    }

    fn add_startup_notice(&mut self) {
        if self.available_providers.is_empty() {
            let vars: Vec<&str> = self
                .providers
                .profiles()
                .iter()
                .map(|p| p.env_var.as_str())
                .collect();
            self.session.add_notice(format!(
                "No API keys found. Please set one of {} in the environment or a .env file.",
                vars.join(", ")
            ));
        } else {
            self.session.add_notice(format!(
                "Ready! Using {}. Press Tab to switch providers.",
                self.session.active_provider().to_uppercase()
            ));
        }
    }

    /// Applies one event. Never blocks and performs no I/O; side effects are
    /// returned for the event loop to run.
    pub fn update(&mut self, event: AppEvent) -> Option<AppCommand> {
        apply_event(self, event)
    }

    pub fn is_streaming(&self) -> bool {
        self.ui.request.is_streaming()
    }

    pub(crate) fn next_stream_id(&mut self) -> u64 {
        self.last_stream_id += 1;
        self.last_stream_id
    }

    pub(crate) fn set_stream_cancel(&mut self, token: CancellationToken) {
        self.stream_cancel = Some(token);
    }

    pub(crate) fn clear_stream_cancel(&mut self) {
        self.stream_cancel = None;
    }

    /// Drops the in-flight request so none of its later events are applied.
    pub fn abandon_stream(&mut self) {
        self.cancel_stream();
        self.ui.request = RequestState::Idle;
    }

    /// Aborts the in-flight request, if any. Used on shutdown.
    pub fn cancel_stream(&mut self) {
        if let Some(token) = self.stream_cancel.take() {
            debug!("Cancelling in-flight stream");
            token.cancel();
        }
    }
}

fn pick_initial_provider(
    providers: &ProviderRegistry,
    available: &[String],
    preferred: Option<&str>,
) -> String {
    if let Some(preferred) = preferred {
        if let Some(profile) = providers.get(preferred) {
            if available.contains(&profile.id) {
                return profile.id.clone();
            }
        }
        warn!(provider = preferred, "Preferred provider is not available");
    }
    available
        .first()
        .cloned()
        .unwrap_or_else(|| FALLBACK_PROVIDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::{test_app_options, test_credentials};

    #[test]
    fn startup_notice_names_active_provider() {
        let app = create_app(&["a", "b"], None);
        assert_eq!(app.session.active_provider(), "a");
        let notice = &app.session.messages()[0];
        assert_eq!(notice.role, TranscriptRole::AppInfo);
        assert_eq!(notice.content, "Ready! Using A. Press Tab to switch providers.");
    }

    #[test]
    fn startup_notice_without_keys_names_env_vars() {
        let app = create_app(&[], None);
        assert!(app.available_providers.is_empty());
        assert_eq!(app.session.active_provider(), FALLBACK_PROVIDER);
        let notice = &app.session.messages()[0];
        assert!(notice.content.starts_with("No API keys found."));
        assert!(notice.content.contains("A_API_KEY"));
        assert!(notice.content.contains("B_API_KEY"));
    }

    #[test]
    fn preferred_provider_wins_when_available() {
        let app = create_app(&["a", "b"], Some("B"));
        assert_eq!(app.session.active_provider(), "b");

        let app = create_app(&["a"], Some("b"));
        assert_eq!(app.session.active_provider(), "a");
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let mut options = test_app_options(&["a", "b"], test_credentials(&["a"]));
        options.theme = Some("no-such-theme".into());
        let app = App::new(options);
        assert_eq!(app.ui.theme_id, default_theme().id);
    }

    #[test]
    fn cancel_stream_fires_token_once() {
        let mut app = create_app(&["a", "b"], None);
        let token = CancellationToken::new();
        app.set_stream_cancel(token.clone());
        app.cancel_stream();
        assert!(token.is_cancelled());
        assert!(app.stream_cancel.is_none());
    }

    fn create_app(credentialed: &[&str], preferred: Option<&str>) -> App {
        let mut options = test_app_options(&["a", "b"], test_credentials(credentialed));
        options.preferred_provider = preferred.map(str::to_string);
        App::new(options)
    }
}
