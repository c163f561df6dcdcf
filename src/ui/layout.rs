use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub banner: Rect,
    pub progress: Rect,
    pub tokens: Rect,
    pub results: Rect,
    pub footer: Rect,
}

/// Stacks the dashboard panes top to bottom. Panes that have nothing to show
/// collapse to zero rows so the results list takes the remaining space.
pub fn split_dashboard_layout(
    area: Rect,
    banner_rows: u16,
    show_progress: bool,
    show_tokens: bool,
) -> DashboardLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_rows),
            Constraint::Length(if show_progress { 1 } else { 0 }),
            Constraint::Length(if show_tokens { 1 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    DashboardLayout {
        header: chunks[0],
        banner: chunks[1],
        progress: chunks[2],
        tokens: chunks[3],
        results: chunks[4],
        footer: chunks[5],
    }
}
