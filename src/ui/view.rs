use crate::state::{Theme, TokenCounter};
use crate::types::Summary;
use chrono::{DateTime, Local, NaiveDateTime};

pub const EMPTY_RESULTS_MESSAGE: &str = "No articles found in the specified time range.";
pub const CAPABILITY_WARNING: &str =
    "Summarizer is not configured. Configure LLM settings in environment variables to enable summarization.";

const PUBLISHED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What the single fetch/stop control currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Checking,
    Fetch,
    Stop,
    ConfigureToEnable,
    StatusCheckFailed,
}

impl TriggerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "Checking LLM...",
            Self::Fetch => "Fetch",
            Self::Stop => "Stop",
            Self::ConfigureToEnable => "Configure LLM to Enable",
            Self::StatusCheckFailed => "Error Checking LLM Status",
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Fetch | Self::Stop)
    }
}

/// Sink for every display change. Implementations must be idempotent:
/// repeating a call with the same input leaves the same visible state.
pub trait Presenter {
    fn show_loading(&mut self, message: &str, percent: f64);
    fn hide_loading(&mut self);
    fn show_tokens(&mut self, tokens: TokenCounter);
    fn hide_tokens(&mut self);
    fn render_results(&mut self, summaries: &[Summary]);
    fn reveal_results(&mut self);
    fn hide_results(&mut self);
    fn show_error(&mut self, message: &str);
    fn clear_error(&mut self);
    fn show_capability_warning(&mut self);
    fn clear_capability_warning(&mut self);
    fn set_trigger(&mut self, trigger: TriggerState);
    fn set_theme(&mut self, theme: Theme);

    fn hide_all_sections(&mut self) {
        self.hide_loading();
        self.hide_results();
        self.clear_error();
        self.clear_capability_warning();
        self.hide_tokens();
    }
}

/// Last progress message and percent. Hiding the panel keeps them so the
/// footer can still report how the job ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingView {
    pub message: String,
    pub percent: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub text: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Empty(&'static str),
    Items(Vec<SummaryView>),
}

/// The display surface, projected onto the terminal by `ui::render`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub loading: LoadingView,
    pub tokens: Option<TokenCounter>,
    pub results: ResultsView,
    pub results_visible: bool,
    pub error: Option<String>,
    pub warning_visible: bool,
    pub trigger: TriggerState,
    pub theme: Theme,
}

impl ViewState {
    pub fn new(theme: Theme) -> Self {
        Self {
            loading: LoadingView::default(),
            tokens: None,
            results: ResultsView::Items(Vec::new()),
            results_visible: false,
            error: None,
            warning_visible: false,
            trigger: TriggerState::Checking,
            theme,
        }
    }

    pub fn tokens_line(&self) -> Option<String> {
        self.tokens.map(|tokens| {
            format!(
                "Total Input Tokens: {} | Total Output Tokens: {}",
                tokens.input_tokens, tokens.output_tokens
            )
        })
    }

    pub fn result_texts(&self) -> Vec<&str> {
        match &self.results {
            ResultsView::Empty(_) => Vec::new(),
            ResultsView::Items(items) => items.iter().map(|item| item.text.as_str()).collect(),
        }
    }

    pub fn progress_percent(&self) -> f64 {
        self.loading.percent
    }

    pub fn status_message(&self) -> &str {
        &self.loading.message
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Presenter for ViewState {
    fn show_loading(&mut self, message: &str, percent: f64) {
        self.loading = LoadingView {
            message: message.to_string(),
            percent,
            visible: true,
        };
    }

    fn hide_loading(&mut self) {
        self.loading.visible = false;
    }

    fn show_tokens(&mut self, tokens: TokenCounter) {
        self.tokens = Some(tokens);
    }

    fn hide_tokens(&mut self) {
        self.tokens = None;
    }

    fn render_results(&mut self, summaries: &[Summary]) {
        self.results = if summaries.is_empty() {
            ResultsView::Empty(EMPTY_RESULTS_MESSAGE)
        } else {
            ResultsView::Items(
                summaries
                    .iter()
                    .map(|summary| SummaryView {
                        text: summary.summary.clone(),
                        published: format_published_time(&summary.published_time),
                    })
                    .collect(),
            )
        };
    }

    fn reveal_results(&mut self) {
        self.results_visible = true;
    }

    fn hide_results(&mut self) {
        self.results_visible = false;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.loading.visible = false;
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn show_capability_warning(&mut self) {
        self.warning_visible = true;
    }

    fn clear_capability_warning(&mut self) {
        self.warning_visible = false;
    }

    fn set_trigger(&mut self, trigger: TriggerState) {
        self.trigger = trigger;
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// Local-time rendering of an ISO-8601 timestamp. Naive timestamps are
/// shown as-is; anything unparseable is passed through untouched.
pub fn format_published_time(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Local)
            .format(PUBLISHED_TIME_FORMAT)
            .to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(PUBLISHED_TIME_FORMAT).to_string();
    }
    raw.to_string()
}
