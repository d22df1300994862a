use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::commands::{all_commands, COMMAND_PREFIX};
use crate::core::app::ExitChoice;
use crate::core::file_browser::FileBrowser;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

const KEY_HELP: [(&str, &str); 7] = [
    ("Enter", "Send message or run command"),
    ("Tab", "Switch provider"),
    ("Ctrl+P", "Toggle provider list"),
    ("?", "Show this help (empty input)"),
    ("Esc", "Back / exit"),
    ("Ctrl+C", "Quit immediately"),
    ("Space", "Close this help"),
];

fn overlay_block<'a>(theme: &Theme, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .title(Span::styled(title, theme.title_style))
        .style(Style::default().bg(theme.background_color).fg(theme.text))
}

pub fn render_help(f: &mut Frame, theme: &Theme, area: Rect) {
    let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(
        "Keys",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    ))];
    for (key, description) in KEY_HELP {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<8}"), key_style),
            Span::styled(description, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Commands",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )));
    for command in all_commands() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {COMMAND_PREFIX}{:<9}", command.name), key_style),
            Span::styled(command.description, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Enter, Space or Esc to go back",
        theme.dim_style.add_modifier(Modifier::ITALIC),
    )));

    let height = lines.len() as u16 + 2;
    let rect = centered_rect(60, height, area);
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines).block(overlay_block(theme, " Help ")),
        rect,
    );
}

pub fn render_file_browser(f: &mut Frame, theme: &Theme, browser: &FileBrowser, area: Rect) {
    let rect = centered_rect(area.width.saturating_sub(8).max(30), area.height.saturating_sub(4), area);
    f.render_widget(Clear, rect);
    let block = overlay_block(theme, " File Browser ");
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    if inner.height < 3 {
        return;
    }

    let header = Rect { height: 1, ..inner };
    let footer = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };
    let list_area = Rect {
        y: inner.y + 2,
        height: inner.height.saturating_sub(3),
        ..inner
    };

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Current Path: ", theme.dim_style),
            Span::styled(
                browser.path.display().to_string(),
                Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD),
            ),
        ])),
        header,
    );

    if browser.is_loading() {
        f.render_widget(Paragraph::new(Span::styled("Loading…", theme.dim_style)), list_area);
    } else if browser.entries().is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("(empty directory)", theme.dim_style)),
            list_area,
        );
    } else {
        let items: Vec<ListItem> = browser
            .entries()
            .iter()
            .map(|entry| {
                let style = if entry.is_dir {
                    Style::default().fg(theme.primary)
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(Span::styled(entry.display_name(), style))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(browser.selected));
        f.render_stateful_widget(
            List::new(items)
                .highlight_style(theme.selection_style)
                .highlight_symbol("› "),
            list_area,
            &mut state,
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "↑↓ to select • Enter/Space/Esc to go back",
            theme.dim_style.add_modifier(Modifier::ITALIC),
        )),
        footer,
    );
}

pub fn render_exit_confirm(f: &mut Frame, theme: &Theme, choice: ExitChoice, area: Rect) {
    let rect = centered_rect(44, 7, area);
    f.render_widget(Clear, rect);

    let selected = Style::default()
        .fg(theme.background_color)
        .bg(theme.primary)
        .add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(theme.text);
    let (yes, no) = match choice {
        ExitChoice::Quit => (selected, idle),
        ExitChoice::Cancel => (idle, selected),
    };

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("  Yes  ", yes),
            Span::raw("   "),
            Span::styled("  No  ", no),
        ]),
        Line::from(Span::styled("y / n • ←→ then Enter", theme.dim_style)),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(overlay_block(theme, " Exit ")),
        rect,
    );
}
