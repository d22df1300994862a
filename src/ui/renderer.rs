use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::{App, BaseMode, UiMode};
use crate::core::message::{Message, TranscriptRole};
use crate::ui::layout::{screen_layout, ScreenLayout};
use crate::ui::overlays;
use crate::ui::theme::Theme;

const BANNER: [&str; 6] = [
    "██████╗ ██╗   ██╗██╗  ██╗██╗   ██╗     ██████╗██╗     ██╗",
    "██╔══██╗██║   ██║██║ ██╔╝██║   ██║    ██╔════╝██║     ██║",
    "██████╔╝██║   ██║█████╔╝ ██║   ██║    ██║     ██║     ██║",
    "██╔═══╝ ██║   ██║██╔═██╗ ██║   ██║    ██║     ██║     ██║",
    "██║     ╚██████╔╝██║  ██╗╚██████╔╝    ╚██████╗███████╗██║",
    "╚═╝      ╚═════╝ ╚═╝  ╚═╝ ╚═════╝      ╚═════╝╚══════╝╚═╝",
];
const COMPACT_TITLE: &str = "PUKU CLI";
const QUICK_COMMANDS: [&str; 4] = ["/help", "/theme", "/new", "/p_drive"];
const SPINNER: [&str; 4] = ["   ", ".  ", ".. ", "..."];

pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.ui.theme;
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let base = app.ui.mode.base();
    let layout = screen_layout(area, base == BaseMode::Chat);

    match base {
        BaseMode::Landing => render_landing(f, app, layout.body),
        BaseMode::Chat => render_transcript(f, app, layout.body),
    }
    if let Some(sidebar) = layout.sidebar {
        render_sidebar(f, app, sidebar);
    }
    render_input(f, app, &layout);
    render_status(f, app, layout.status);

    match &app.ui.mode {
        UiMode::Landing | UiMode::Chat => {}
        UiMode::Help { .. } => overlays::render_help(f, theme, area),
        UiMode::FileBrowser { browser, .. } => overlays::render_file_browser(f, theme, browser, area),
        UiMode::ExitConfirm { choice, .. } => overlays::render_exit_confirm(f, theme, *choice, area),
    }
}

fn render_landing(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut lines: Vec<Line<'static>> = Vec::new();

    let banner_width = BANNER[0].width() as u16;
    if area.width >= banner_width {
        lines.extend(banner_lines(theme, app.ui.tick));
    } else {
        lines.push(Line::from(Span::styled(COMPACT_TITLE, theme.title_style)));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Chat with AI from your terminal",
        theme.dim_style,
    )));
    lines.push(Line::default());

    let mut quick = vec![Span::styled("Try: ", theme.dim_style)];
    for (i, command) in QUICK_COMMANDS.iter().enumerate() {
        if i > 0 {
            quick.push(Span::styled("  ", theme.dim_style));
        }
        quick.push(Span::styled(
            *command,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(quick));
    lines.push(Line::default());

    let width = area.width.saturating_sub(4).max(1) as usize;
    for message in app.session.messages() {
        lines.extend(message_lines(message, theme, width));
    }

    let top_pad = area.height.saturating_sub(lines.len() as u16) / 3;
    let mut padded = vec![Line::default(); top_pad as usize];
    padded.extend(lines);
    f.render_widget(Paragraph::new(padded).alignment(Alignment::Center), area);
}

/// Banner rows with a gradient from `secondary` to `accent` that drifts
/// with the tick counter.
pub fn banner_lines(theme: &Theme, tick: u64) -> Vec<Line<'static>> {
    let rows = BANNER.len() as u64;
    let period = rows * 2;
    BANNER
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let phase = (i as u64 + tick) % period;
            let step = if phase < rows { phase } else { period - phase };
            let t = step as f32 / rows as f32;
            let color = interpolate_color(theme.secondary, theme.accent, t);
            Line::from(Span::styled(
                *row,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        })
        .collect()
}

fn interpolate_color(from: Color, to: Color, t: f32) -> Color {
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let t = t.clamp(0.0, 1.0);
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style)
        .title(Span::styled(" PUKU CHAT ", theme.title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = transcript_lines(app, inner.width.max(1) as usize);
    let overflow = lines.len().saturating_sub(inner.height as usize);
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

/// Transcript wrapped to `width` columns, including the response in flight.
pub fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let theme = &app.ui.theme;
    let mut lines = Vec::new();
    for message in app.session.messages() {
        lines.extend(message_lines(message, theme, width));
        lines.push(Line::default());
    }

    if app.ui.request.is_loading() {
        let dots = SPINNER[(app.ui.tick % SPINNER.len() as u64) as usize];
        lines.push(Line::from(vec![
            Span::styled("AI: ", theme.assistant_prefix_style),
            Span::styled(format!("Thinking{dots}"), theme.streaming_indicator_style),
        ]));
    } else if app.ui.request.is_streaming() {
        let partial = Message::assistant(format!("{}▌", app.ui.request.buffer()));
        lines.extend(message_lines(&partial, theme, width));
    }
    lines
}

fn message_lines(message: &Message, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let (prefix, prefix_style, text_style) = match message.role {
        TranscriptRole::User => ("You: ", theme.user_prefix_style, theme.user_text_style),
        TranscriptRole::Assistant => (
            "AI: ",
            theme.assistant_prefix_style,
            theme.assistant_text_style,
        ),
        TranscriptRole::AppInfo => ("• ", theme.info_text_style, theme.info_text_style),
        TranscriptRole::AppError => ("✗ ", theme.error_text_style, theme.error_text_style),
    };
    let indent = " ".repeat(prefix.width());
    let body_width = width.saturating_sub(prefix.width()).max(1);

    let mut lines = Vec::new();
    for logical in message.content.split('\n') {
        for row in wrap_line(logical, body_width) {
            let lead = if lines.is_empty() {
                Span::styled(prefix, prefix_style)
            } else {
                Span::raw(indent.clone())
            };
            lines.push(Line::from(vec![lead, Span::styled(row, text_style)]));
        }
    }
    lines
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_inclusive(' ') {
        let word_width = word.trim_end_matches(' ').width();
        if current_width > 0 && current_width + word_width > width {
            rows.push(current.trim_end_matches(' ').to_string());
            current.clear();
            current_width = 0;
        }
        if word_width > width {
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if current_width + w > width && current_width > 0 {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
            continue;
        }
        current.push_str(word);
        current_width += word.width();
    }
    rows.push(current.trim_end_matches(' ').to_string());
    rows
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let section = Style::default().fg(theme.primary).add_modifier(Modifier::BOLD);
    let active = Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD);
    let item = theme.dim_style;
    let current = app.session.active_provider();

    let mut lines = vec![
        Line::from(Span::styled("PUKU CHAT", theme.title_style)),
        Line::default(),
        Line::from(Span::styled("PROVIDER", section)),
    ];
    if app.ui.show_providers && app.available_providers.len() > 1 {
        for id in &app.available_providers {
            if id == current {
                lines.push(Line::from(Span::styled(format!("→ {}", id.to_uppercase()), active)));
            } else {
                lines.push(Line::from(Span::styled(format!("  {}", id.to_uppercase()), item)));
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            format!("→ {}", current.to_uppercase()),
            active,
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("THEME", section)));
    lines.push(Line::from(Span::styled(
        format!("→ {}", app.ui.theme_id.to_uppercase()),
        active,
    )));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("CONTROLS", section)));
    for control in [
        "Tab - Switch Provider",
        "Ctrl+P - Toggle Providers",
        "? - Help",
        "Esc - Exit",
    ] {
        lines.push(Line::from(Span::styled(control, item)));
    }

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(theme.border_style);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_input(f: &mut Frame, app: &App, layout: &ScreenLayout) {
    let theme = &app.ui.theme;
    let area = layout.input;
    let title = if app.ui.request.is_streaming() {
        " Receiving response… "
    } else {
        " Message "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.title_style));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let max_width = inner.width.saturating_sub(1) as usize;
    let (visible, cursor_offset) = visible_input_tail(&app.ui.input, max_width);
    let text = if app.ui.input.is_empty() {
        Line::from(Span::styled(
            "Type a message, or /help for commands",
            theme.dim_style.bg(theme.input_background),
        ))
    } else {
        Line::from(Span::styled(visible, theme.input_text_style))
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.input_background)),
        inner,
    );

    if app.ui.mode.accepts_input() && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position((inner.x + cursor_offset as u16, inner.y));
    }
}

/// The rightmost part of `input` that fits in `max_width` columns, and the
/// cursor column after it.
pub fn visible_input_tail(input: &str, max_width: usize) -> (String, usize) {
    let mut width = 0;
    let mut start = input.len();
    for (index, c) in input.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = index;
    }
    (input[start..].to_string(), width)
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let provider = app.session.active_provider();
    let connection = if app.available_providers.is_empty() {
        Span::styled("● No API Keys", Style::default().fg(theme.error))
    } else {
        Span::styled(
            format!("● {}", provider.to_uppercase()),
            Style::default().fg(theme.success),
        )
    };
    let model = app
        .providers
        .get(provider)
        .map(|profile| format!("  {}", profile.model))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::raw(" "),
        connection,
        Span::styled(model, theme.dim_style),
        Span::styled("   Tab switch • ? help • Esc exit", theme.dim_style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
