use crate::ui::builtin_themes::ThemeSpec;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub display_name: String,

    // Palette
    pub background_color: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub dim_text: Color,
    pub border: Color,
    pub input_background: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub info_text_style: Style,
    pub error_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub dim_style: Style,
    pub streaming_indicator_style: Style,
    pub border_style: Style,
    pub selection_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    /// Builds styles from a palette. Unparseable colors fall back to the
    /// terminal default.
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let color = |s: &str| parse_color(s).unwrap_or(Color::Reset);

        let background_color = color(&spec.background);
        let primary = color(&spec.primary);
        let secondary = color(&spec.secondary);
        let accent = color(&spec.accent);
        let text = color(&spec.text);
        let dim_text = color(&spec.dim_text);
        let border = color(&spec.border);
        let input_background = color(&spec.input_background);
        let success = color(&spec.success);
        let warning = color(&spec.warning);
        let error = color(&spec.error);
        let highlight = color(&spec.highlight);

        Theme {
            display_name: spec.display_name.clone(),
            background_color,
            primary,
            secondary,
            accent,
            text,
            dim_text,
            border,
            input_background,
            success,
            warning,
            error,
            highlight,

            user_prefix_style: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(text),
            assistant_prefix_style: Style::default().fg(success).add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(secondary),
            info_text_style: Style::default().fg(dim_text).add_modifier(Modifier::ITALIC),
            error_text_style: Style::default().fg(error),

            title_style: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            dim_style: Style::default().fg(dim_text),
            streaming_indicator_style: Style::default().fg(warning),
            border_style: Style::default().fg(border),
            selection_style: Style::default()
                .fg(background_color)
                .bg(highlight)
                .add_modifier(Modifier::BOLD),

            input_border_style: Style::default().fg(accent),
            input_text_style: Style::default().fg(text).bg(input_background),
        }
    }
}

/// Parses `#rgb`, `#rrggbb`, `rgb(r,g,b)` or a basic color name.
pub fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if let Some(c) = parse_hex_color(&lower) {
        return Some(c);
    }
    if let Some(c) = parse_rgb_func(&lower) {
        return Some(c);
    }
    match lower.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark-grey" | "darkgray" => Some(Color::DarkGray),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "yellow" => Some(Color::Yellow),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    if hex.len() == 3 {
        let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

fn parse_rgb_func(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<_> = content
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u16>().ok()?;
    let g = parts[1].parse::<u16>().ok()?;
    let b = parts[2].parse::<u16>().ok()?;
    Some(Color::Rgb(
        r.min(255) as u8,
        g.min(255) as u8,
        b.min(255) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::builtin_themes::find_builtin_theme;

    #[test]
    fn parses_hex_and_rgb_forms() {
        assert_eq!(parse_color("#1a1b26"), Some(Color::Rgb(0x1a, 0x1b, 0x26)));
        assert_eq!(parse_color("#FFF"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_color("rgb(300, 0, 12)"), Some(Color::Rgb(255, 0, 12)));
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#ééé"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn from_spec_maps_palette() {
        let spec = find_builtin_theme("puku").expect("puku theme");
        let theme = Theme::from_spec(&spec);
        assert_eq!(theme.background_color, Color::Rgb(0x1a, 0x1b, 0x26));
        assert_eq!(theme.primary, Color::Rgb(0xb7, 0x94, 0xf6));
        assert_eq!(theme.error_text_style.fg, Some(theme.error));
        assert_eq!(theme.display_name, "PUKU");
    }

    #[test]
    fn bad_colors_fall_back_to_reset() {
        let mut spec = find_builtin_theme("ocean").expect("ocean theme");
        spec.primary = "not-a-color".into();
        let theme = Theme::from_spec(&spec);
        assert_eq!(theme.primary, Color::Reset);
    }
}
