use crate::state::Theme;
use crate::ui::text::{truncate_line, wrap_words};
use crate::ui::view::{LoadingView, ResultsView, TriggerState, ViewState, CAPABILITY_WARNING};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Gauge, Paragraph},
    Frame,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub warning: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Rgb(33, 37, 41),
                bg: Color::Rgb(248, 249, 250),
                accent: Color::Rgb(13, 110, 253),
                muted: Color::Rgb(108, 117, 125),
                error: Color::Rgb(176, 42, 55),
                warning: Color::Rgb(153, 102, 0),
            },
            Theme::Dark => Self {
                fg: Color::Rgb(222, 226, 230),
                bg: Color::Rgb(24, 24, 24),
                accent: Color::Rgb(110, 168, 254),
                muted: Color::Rgb(134, 142, 150),
                error: Color::Rgb(234, 134, 143),
                warning: Color::Rgb(255, 218, 106),
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Fields shown in the header next to the trigger.
pub struct HeaderFields<'a> {
    pub trigger: TriggerState,
    pub lookback_input: &'a str,
    pub summary_type: &'a str,
    pub theme: Theme,
    pub form_locked: bool,
}

pub fn render_header(frame: &mut Frame<'_>, area: Rect, fields: &HeaderFields<'_>, palette: Palette) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let trigger_style = if fields.trigger.is_enabled() {
        Style::default()
            .fg(palette.bg)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted).add_modifier(Modifier::DIM)
    };
    let field_style = if fields.form_locked {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.fg)
    };
    let lookback = if fields.lookback_input.is_empty() {
        "_"
    } else {
        fields.lookback_input
    };

    let line = Line::from(vec![
        Span::styled(" newsbrief ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("[ {} ]", fields.trigger.label()), trigger_style),
        Span::raw("  "),
        Span::styled(format!("lookback: {lookback} min"), field_style),
        Span::raw("  "),
        Span::styled(format!("type: {}", fields.summary_type), field_style),
        Span::raw("  "),
        Span::styled(
            format!("theme: {}", fields.theme.as_str()),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(palette.base()), area);
}

pub fn banner_lines(view: &ViewState) -> Vec<(String, bool)> {
    let mut lines = Vec::new();
    if view.warning_visible {
        lines.push((CAPABILITY_WARNING.to_string(), false));
    }
    if let Some(error) = &view.error {
        lines.push((format!("Error: {error}"), true));
    }
    lines
}

pub fn render_banners(frame: &mut Frame<'_>, area: Rect, view: &ViewState, palette: Palette) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let width = area.width as usize;
    let lines: Vec<Line> = banner_lines(view)
        .into_iter()
        .map(|(text, is_error)| {
            let color = if is_error { palette.error } else { palette.warning };
            Line::styled(
                truncate_line(&text, width),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).style(palette.base()), area);
}

pub fn render_progress(frame: &mut Frame<'_>, area: Rect, loading: &LoadingView, palette: Palette) {
    if area.height == 0 || area.width == 0 || !loading.visible {
        return;
    }

    let percent = loading.percent.clamp(0.0, 100.0);
    let label = truncate_line(
        &format!("{} {:.0}%", loading.message, percent),
        area.width as usize,
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(palette.accent).bg(palette.bg))
            .ratio(percent / 100.0)
            .label(Span::styled(label, Style::default().fg(palette.fg))),
        area,
    );
}

pub fn render_tokens(frame: &mut Frame<'_>, area: Rect, view: &ViewState, palette: Palette) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let Some(line) = view.tokens_line() else {
        return;
    };
    frame.render_widget(
        Paragraph::new(truncate_line(&line, area.width as usize))
            .style(palette.base().fg(palette.muted)),
        area,
    );
}

/// Builds the result list lines. `live` renders results that have not been
/// revealed yet, dimmed, so partial summaries show up while a job streams.
pub fn result_lines(view: &ViewState, width: usize, live: bool, palette: Palette) -> Vec<Line<'static>> {
    if !view.results_visible && !live {
        return Vec::new();
    }

    let text_style = if view.results_visible {
        Style::default().fg(palette.fg)
    } else {
        Style::default().fg(palette.muted).add_modifier(Modifier::DIM)
    };

    match &view.results {
        ResultsView::Empty(message) => {
            if view.results_visible {
                vec![Line::styled(
                    truncate_line(message, width),
                    Style::default().fg(palette.muted),
                )]
            } else {
                Vec::new()
            }
        }
        ResultsView::Items(items) => {
            let body_width = width.saturating_sub(2).max(1);
            let mut lines = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    lines.push(Line::from(""));
                }
                for (row, wrapped) in wrap_words(&item.text, body_width).into_iter().enumerate() {
                    let prefix = if row == 0 { "• " } else { "  " };
                    lines.push(Line::styled(format!("{prefix}{wrapped}"), text_style));
                }
                lines.push(Line::styled(
                    format!("  {}", truncate_line(&item.published, body_width)),
                    Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
                ));
            }
            lines
        }
    }
}

/// Largest useful scroll offset for `line_count` lines in `viewport_rows`.
pub fn clamp_scroll(scroll: usize, line_count: usize, viewport_rows: usize) -> usize {
    scroll.min(line_count.saturating_sub(viewport_rows))
}

/// Draws the result list and returns the scroll offset actually used, so the
/// caller can keep its offset inside the list.
pub fn render_results(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &ViewState,
    live: bool,
    scroll: usize,
    palette: Palette,
) -> usize {
    if area.height == 0 || area.width == 0 {
        return scroll;
    }

    let lines = result_lines(view, area.width as usize, live, palette);
    let scroll = clamp_scroll(scroll, lines.len(), area.height as usize);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(palette.base())
            .scroll((scroll as u16, 0)),
        area,
    );
    scroll
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str, palette: Palette) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = truncate_line(status, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(palette.base().fg(palette.muted)),
        area,
    );
}
