use tracing::debug;

use super::App;
use crate::ui::builtin_themes::{find_builtin_theme, load_builtin_themes, ThemeSpec};
use crate::ui::theme::Theme;

impl App {
    /// Advances to the next available provider, wrapping at the end.
    pub fn switch_provider(&mut self) {
        match self.available_providers.len() {
            0 => {
                self.session
                    .add_notice("No providers available. Set an API key to enable one.");
            }
            1 => {
                let only = self.providers.label(&self.available_providers[0]);
                self.session
                    .add_notice(format!("Only one provider available: {only}"));
            }
            len => {
                let next = self
                    .available_providers
                    .iter()
                    .position(|id| id == self.session.active_provider())
                    .map(|index| (index + 1) % len)
                    .unwrap_or(0);
                let id = self.available_providers[next].clone();
                self.activate_provider(id);
            }
        }
    }

    /// Makes `id` the active provider if it has a credential.
    pub fn select_provider(&mut self, id: &str) -> Result<(), String> {
        let Some(found) = self
            .available_providers
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(id))
            .cloned()
        else {
            return Err(if self.available_providers.is_empty() {
                format!("Provider '{id}' is not available. No API keys are configured.")
            } else {
                format!(
                    "Provider '{id}' is not available. Available: {}",
                    self.available_providers.join(", ")
                )
            });
        };
        self.activate_provider(found);
        Ok(())
    }

    fn activate_provider(&mut self, id: String) {
        debug!(provider = %id, "Switching provider");
        let label = self.providers.label(&id);
        self.session.set_provider(id, &label);
    }

    /// Moves to the next built-in theme, wrapping at the end.
    pub fn cycle_theme(&mut self) {
        let themes = load_builtin_themes();
        if themes.is_empty() {
            return;
        }
        let next = themes
            .iter()
            .position(|t| t.id.eq_ignore_ascii_case(&self.ui.theme_id))
            .map(|index| (index + 1) % themes.len())
            .unwrap_or(0);
        self.apply_theme(&themes[next]);
    }

    pub fn set_theme(&mut self, id: &str) -> Result<(), String> {
        let spec = find_builtin_theme(id).ok_or_else(|| format!("Unknown theme: {id}"))?;
        self.apply_theme(&spec);
        Ok(())
    }

    fn apply_theme(&mut self, spec: &ThemeSpec) {
        self.ui.theme = Theme::from_spec(spec);
        self.ui.theme_id = spec.id.clone();
        self.session
            .add_notice(format!("Switched to {} theme", spec.display_name));
    }
}
