use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_WIDTH: u16 = 26;
/// Below this width the sidebar is hidden so the transcript stays readable.
pub const MIN_WIDTH_FOR_SIDEBAR: u16 = 70;

/// Main regions of the base screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub body: Rect,
    pub sidebar: Option<Rect>,
    pub input: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect, want_sidebar: bool) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let (body, sidebar) = if want_sidebar && area.width >= MIN_WIDTH_FOR_SIDEBAR {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
            .split(rows[0]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[0], None)
    };

    ScreenLayout {
        body,
        sidebar,
        input: rows[1],
        status: rows[2],
    }
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
