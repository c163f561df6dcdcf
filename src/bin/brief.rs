use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use newsbrief::app::{build_runtime, App};
use newsbrief::config::Config;
use newsbrief::runtime::{FrontendAdapter, LookbackEdit, UserInputEvent};
use newsbrief::terminal;
use newsbrief::ui::layout::split_dashboard_layout;
use newsbrief::ui::render::{
    banner_lines, render_banners, render_header, render_progress, render_results,
    render_status_line, render_tokens, HeaderFields, Palette,
};
use ratatui::widgets::Clear;
use std::time::Duration;

const KEY_HINTS: &str = "enter fetch/stop · 0-9 lookback · tab type · t theme · q quit";
const QUIT_ARMED_HINT: &str = "Press Ctrl+C again to quit";
const PAGE_ROWS: usize = 10;

struct ManagedTuiFrontend {
    terminal: terminal::TerminalType,
    quit: bool,
    results_scroll: usize,
}

impl ManagedTuiFrontend {
    fn new() -> Result<Self> {
        let terminal = terminal::setup()?;
        Self::drain_startup_events();
        Ok(Self {
            terminal,
            quit: false,
            results_scroll: 0,
        })
    }

    fn drain_startup_events() {
        for _ in 0..1024 {
            match event::poll(Duration::from_millis(0)) {
                Ok(true) => {
                    if event::read().is_err() {
                        break;
                    }
                }
                Ok(false) | Err(_) => break,
            }
        }
    }

    fn map_key(&mut self, key: KeyEvent) -> Option<UserInputEvent> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UserInputEvent::Interrupt)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UserInputEvent::EditLookback(LookbackEdit::Clear))
            }
            KeyCode::Enter => {
                self.results_scroll = 0;
                Some(UserInputEvent::Trigger)
            }
            KeyCode::Tab => Some(UserInputEvent::CycleSummaryType),
            KeyCode::Backspace => Some(UserInputEvent::EditLookback(LookbackEdit::Backspace)),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                Some(UserInputEvent::EditLookback(LookbackEdit::Insert(ch)))
            }
            KeyCode::Char('t') => Some(UserInputEvent::ToggleTheme),
            KeyCode::Char('q') => Some(UserInputEvent::Quit),
            KeyCode::Up => {
                self.results_scroll = self.results_scroll.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.results_scroll = self.results_scroll.saturating_add(1);
                None
            }
            KeyCode::PageUp => {
                self.results_scroll = self.results_scroll.saturating_sub(PAGE_ROWS);
                None
            }
            KeyCode::PageDown => {
                self.results_scroll = self.results_scroll.saturating_add(PAGE_ROWS);
                None
            }
            KeyCode::Home => {
                self.results_scroll = 0;
                None
            }
            _ => None,
        }
    }
}

impl Drop for ManagedTuiFrontend {
    fn drop(&mut self) {
        terminal::restore();
    }
}

impl FrontendAdapter for ManagedTuiFrontend {
    fn poll_user_input(&mut self, app: &App) -> Option<UserInputEvent> {
        if app.quit_requested() {
            self.quit = true;
            return None;
        }

        let Ok(has_event) = event::poll(Duration::from_millis(16)) else {
            self.quit = true;
            return None;
        };
        if !has_event {
            return None;
        }

        let Ok(ev) = event::read() else {
            self.quit = true;
            return None;
        };

        match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.map_key(key),
            _ => None,
        }
    }

    fn render(&mut self, app: &App) {
        let view = app.view();
        let form = app.form();
        let palette = Palette::for_theme(view.theme);
        let live = app.job_status().is_active();
        let fields = HeaderFields {
            trigger: view.trigger,
            lookback_input: &form.lookback_input,
            summary_type: form.summary_type(),
            theme: view.theme,
            form_locked: live,
        };
        let job_label = app.job_status().label();
        let status = if app.quit_armed() {
            QUIT_ARMED_HINT.to_string()
        } else if view.status_message().is_empty() {
            format!("[{job_label}] {KEY_HINTS}")
        } else {
            format!("[{job_label}] {} | {KEY_HINTS}", view.status_message())
        };
        let mut scroll = self.results_scroll;

        let _ = self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(Clear, area);
            let banner_rows = banner_lines(view).len() as u16;
            let panes =
                split_dashboard_layout(area, banner_rows, view.loading.visible, view.tokens.is_some());

            render_header(frame, panes.header, &fields, palette);
            render_banners(frame, panes.banner, view, palette);
            render_progress(frame, panes.progress, &view.loading, palette);
            render_tokens(frame, panes.tokens, view, palette);
            scroll = render_results(frame, panes.results, view, live, scroll, palette);
            render_status_line(frame, panes.footer, &status, palette);
        });
        self.results_scroll = scroll;
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let mut runtime = build_runtime(config)?;
    let mut frontend = ManagedTuiFrontend::new()?;
    runtime.run(&mut frontend).await;
    Ok(())
}
