use serde::{Deserialize, Serialize};

/// Body of `POST /api/get-news-summary/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub lookback_minutes: u32,
    pub summary_type: String,
}

/// Body of `GET /api/check-summarizer/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SummarizerStatus {
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
    pub published_time: String,
}

impl Summary {
    pub fn new(summary: impl Into<String>, published_time: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            published_time: published_time.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Progress {
        #[serde(default)]
        message: String,
        #[serde(default)]
        progress: f64,
    },
    Tokens {
        #[serde(default)]
        input_tokens: u64,
        #[serde(default)]
        output_tokens: u64,
    },
    Summary {
        summary: String,
        published_time: String,
    },
    Result {
        #[serde(default)]
        summaries: Vec<Summary>,
        #[serde(default)]
        total_input_tokens: u64,
        #[serde(default)]
        total_output_tokens: u64,
        #[serde(default = "default_available")]
        summarizer_available: bool,
    },
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Unknown,
}

fn default_available() -> bool {
    true
}

/// Plain JSON reply the backend sends instead of a stream when the job
/// cannot start (no articles in range, bad request body).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorEnvelope {
    pub fn into_event(self) -> Option<StreamEvent> {
        (self.status == "error").then_some(StreamEvent::Error {
            message: self.message,
        })
    }
}
