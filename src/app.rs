use crate::api::logging::emit_state_save_failure;
use crate::api::ApiClient;
use crate::config::Config;
use crate::runtime::{LookbackEdit, Runtime, UserInputEvent};
use crate::state::{JobController, JobStatus, JobUpdate, Theme, ThemeStore, TriggerAction};
use crate::ui::{Presenter, ViewState};
use anyhow::Result;
use std::time::Instant;

pub const SUMMARY_TYPES: [&str; 2] = ["sentence", "paragraph"];
const MAX_LOOKBACK_INPUT_CHARS: usize = 4;

/// Lookback and summary-type fields of the fetch form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub lookback_input: String,
    summary_types: Vec<String>,
    summary_type_index: usize,
}

impl FormState {
    pub fn new(lookback_input: &str, summary_type: &str) -> Self {
        let mut summary_types: Vec<String> = SUMMARY_TYPES.iter().map(|t| t.to_string()).collect();
        let summary_type_index = match summary_types.iter().position(|t| t == summary_type) {
            Some(index) => index,
            None => {
                summary_types.insert(0, summary_type.to_string());
                0
            }
        };
        Self {
            lookback_input: lookback_input
                .chars()
                .filter(char::is_ascii_digit)
                .take(MAX_LOOKBACK_INPUT_CHARS)
                .collect(),
            summary_types,
            summary_type_index,
        }
    }

    pub fn summary_type(&self) -> &str {
        &self.summary_types[self.summary_type_index]
    }

    pub fn cycle_summary_type(&mut self) {
        self.summary_type_index = (self.summary_type_index + 1) % self.summary_types.len();
    }

    pub fn edit_lookback(&mut self, edit: LookbackEdit) {
        match edit {
            LookbackEdit::Insert(ch) => {
                if ch.is_ascii_digit() && self.lookback_input.len() < MAX_LOOKBACK_INPUT_CHARS {
                    self.lookback_input.push(ch);
                }
            }
            LookbackEdit::Backspace => {
                self.lookback_input.pop();
            }
            LookbackEdit::Clear => self.lookback_input.clear(),
        }
    }
}

pub struct App {
    controller: JobController,
    view: ViewState,
    form: FormState,
    theme_store: ThemeStore,
    pending_quit: bool,
    quit_requested: bool,
}

impl App {
    pub fn new(controller: JobController, theme_store: ThemeStore, form: FormState) -> Self {
        let theme = theme_store.load();
        Self {
            controller,
            view: ViewState::new(theme),
            form,
            theme_store,
            pending_quit: false,
            quit_requested: false,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn job_status(&self) -> JobStatus {
        self.controller.job().status
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn quit_armed(&self) -> bool {
        self.pending_quit
    }

    pub fn check_summarizer(&mut self) {
        self.controller.check_summarizer(&mut self.view);
    }

    pub fn on_user_input(&mut self, event: UserInputEvent) {
        if event != UserInputEvent::Interrupt {
            self.pending_quit = false;
        }
        match event {
            UserInputEvent::Trigger => {
                self.press_trigger();
            }
            UserInputEvent::ToggleTheme => {
                self.toggle_theme();
            }
            UserInputEvent::CycleSummaryType => {
                if !self.job_status().is_active() {
                    self.form.cycle_summary_type();
                }
            }
            UserInputEvent::EditLookback(edit) => {
                if !self.job_status().is_active() {
                    self.form.edit_lookback(edit);
                }
            }
            UserInputEvent::Interrupt => self.on_interrupt(),
            UserInputEvent::Quit => self.quit_requested = true,
        }
    }

    pub fn press_trigger(&mut self) -> TriggerAction {
        let lookback = self.form.lookback_input.clone();
        let summary_type = self.form.summary_type().to_string();
        self.controller
            .trigger(&lookback, &summary_type, &mut self.view)
    }

    /// Flips the theme, persisting it before the view changes so the stored
    /// value and the displayed one never disagree.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.view.theme.toggled();
        match self.theme_store.save(next) {
            Ok(()) => self.view.set_theme(next),
            Err(error) => emit_state_save_failure(self.theme_store.path(), &error),
        }
        self.view.theme
    }

    pub fn handle_update(&mut self, update: JobUpdate, now: Instant) {
        self.controller.handle_update(update, now, &mut self.view);
    }

    pub fn tick(&mut self, now: Instant) {
        self.controller.tick(now, &mut self.view);
    }

    /// Stops a running job if the app exits mid-stream.
    pub fn shutdown(&mut self) {
        self.controller.cancel();
    }

    fn on_interrupt(&mut self) {
        if self.job_status() == JobStatus::Running {
            self.controller.cancel();
            self.pending_quit = false;
            return;
        }

        if self.pending_quit {
            self.quit_requested = true;
        } else {
            self.pending_quit = true;
        }
    }
}

pub fn build_runtime(config: Config) -> Result<Runtime> {
    let client = ApiClient::new(&config)?;
    let (controller, update_rx) = JobController::new(client);
    let form = FormState::new(&config.lookback_minutes, &config.summary_type);
    let app = App::new(controller, ThemeStore::new(config.state_path.clone()), form);
    Ok(Runtime::new(app, update_rx))
}
