use serde::Deserialize;

/// Palette entry from `builtins/themes.toml`. Colors are hex strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSpec {
    pub id: String,
    pub display_name: String,
    pub background: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub dim_text: String,
    pub border: String,
    pub input_background: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub highlight: String,
}

#[derive(Debug, Deserialize)]
struct BuiltinThemesConfig {
    themes: Vec<ThemeSpec>,
}

/// Built-in themes in cycling order.
pub fn load_builtin_themes() -> Vec<ThemeSpec> {
    const CONFIG_CONTENT: &str = include_str!("../builtins/themes.toml");
    let config: BuiltinThemesConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtins/themes.toml");
    config.themes
}

pub fn find_builtin_theme(id: &str) -> Option<ThemeSpec> {
    load_builtin_themes()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
}

pub fn default_theme() -> ThemeSpec {
    load_builtin_themes()
        .into_iter()
        .next()
        .expect("builtins/themes.toml defines at least one theme")
}

pub fn theme_ids() -> Vec<String> {
    load_builtin_themes().into_iter().map(|t| t.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::parse_color;

    #[test]
    fn load_has_expected_builtins_in_order() {
        assert_eq!(theme_ids(), vec!["puku", "ocean", "forest"]);
        assert_eq!(default_theme().id, "puku");
    }

    #[test]
    fn find_builtin_theme_works_case_insensitive() {
        let t = find_builtin_theme("OcEaN").expect("should find 'ocean'");
        assert_eq!(t.id, "ocean");
        assert!(find_builtin_theme("dracula").is_none());
    }

    #[test]
    fn every_palette_color_parses() {
        for spec in load_builtin_themes() {
            for color in [
                &spec.background,
                &spec.primary,
                &spec.secondary,
                &spec.accent,
                &spec.text,
                &spec.dim_text,
                &spec.border,
                &spec.input_background,
                &spec.success,
                &spec.warning,
                &spec.error,
                &spec.highlight,
            ] {
                assert!(parse_color(color).is_some(), "{}: {color}", spec.id);
            }
        }
    }
}
