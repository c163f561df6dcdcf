use crate::types::Summary;
use tokio_util::sync::CancellationToken;

pub const MAX_LOOKBACK_MINUTES: u32 = 120;
pub const MIN_LOOKBACK_MINUTES: u32 = 1;
pub const DEFAULT_LOOKBACK_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Running,
    Cancelling,
    /// `result` received; the pacing delays are still pending.
    Finalizing,
    Completed,
    Failed,
    Aborted,
}

impl JobStatus {
    /// True while the job owns a live request or a pending reveal.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Cancelling | Self::Finalizing)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Cancelling => "cancelling",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Aborted => "stopped",
        }
    }
}

/// Running totals as reported by the server; replaced, never summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounter {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenCounter {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    items: Vec<Summary>,
}

impl ResultSet {
    pub fn push(&mut self, summary: Summary) {
        self.items.push(summary);
    }

    /// The final server list supersedes every partial appended so far.
    pub fn replace(&mut self, summaries: Vec<Summary>) {
        self.items = summaries;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[Summary] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The single active (or most recent) summary request.
#[derive(Debug)]
pub struct Job {
    pub id: u64,
    pub lookback_minutes: u32,
    pub summary_type: String,
    pub status: JobStatus,
    pub results: ResultSet,
    pub tokens: TokenCounter,
    cancel_token: Option<CancellationToken>,
}

impl Job {
    pub fn idle() -> Self {
        Self {
            id: 0,
            lookback_minutes: DEFAULT_LOOKBACK_MINUTES,
            summary_type: String::new(),
            status: JobStatus::Idle,
            results: ResultSet::default(),
            tokens: TokenCounter::default(),
            cancel_token: None,
        }
    }

    pub fn start(id: u64, lookback_minutes: u32, summary_type: String) -> Self {
        Self {
            id,
            lookback_minutes,
            summary_type,
            status: JobStatus::Running,
            results: ResultSet::default(),
            tokens: TokenCounter::default(),
            cancel_token: Some(CancellationToken::new()),
        }
    }

    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        self.cancel_token.as_ref()
    }

    /// Fires the token if one is live. Returns false when nothing was running.
    pub fn signal_cancel(&mut self) -> bool {
        match &self.cancel_token {
            Some(token) if self.status == JobStatus::Running => {
                token.cancel();
                self.status = JobStatus::Cancelling;
                true
            }
            _ => false,
        }
    }

    pub fn release_token(&mut self) {
        self.cancel_token = None;
    }
}

/// Normalizes the lookback input the way the fetch form does: leading
/// digits are parsed, anything non-numeric (or zero) means the default,
/// and the result is capped at two hours.
pub fn clamp_lookback(input: &str) -> u32 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if leading.is_empty() {
        return DEFAULT_LOOKBACK_MINUTES;
    }
    if negative {
        return if leading.bytes().all(|b| b == b'0') {
            DEFAULT_LOOKBACK_MINUTES
        } else {
            MIN_LOOKBACK_MINUTES
        };
    }

    // Anything too long for u32 is far above the cap anyway.
    match leading.parse::<u32>() {
        Ok(0) => DEFAULT_LOOKBACK_MINUTES,
        Ok(value) => value.min(MAX_LOOKBACK_MINUTES),
        Err(_) => MAX_LOOKBACK_MINUTES,
    }
}
