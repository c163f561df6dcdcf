use crate::util::is_local_endpoint_url;
use thiserror::Error;

pub const REQUEST_REJECTED_MESSAGE: &str = "Network response was not ok";

/// Terminal outcome of a capability check or a summary job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("summarizer status check failed: {0}")]
    CapabilityCheckFailed(String),
    #[error("{REQUEST_REJECTED_MESSAGE}")]
    RequestRejected { status: u16 },
    #[error("request cancelled")]
    Cancelled,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Server(String),
    #[error("Stream ended before final result")]
    IncompleteStream,
}

impl JobError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub(crate) fn from_transport(error: reqwest::Error, request_url: &str) -> Self {
        if error.is_connect() && is_local_endpoint_url(request_url) {
            return Self::Transport(format!(
                "cannot reach local summary endpoint '{request_url}': {error}. Start the news server or update NEWSBRIEF_URL."
            ));
        }
        if error.is_connect() {
            return Self::Transport(format!(
                "cannot reach summary endpoint '{request_url}': {error}"
            ));
        }
        if error.is_timeout() {
            return Self::Transport(format!(
                "request to '{request_url}' timed out: {error}"
            ));
        }
        if let Some(status) = error.status() {
            return Self::RequestRejected {
                status: status.as_u16(),
            };
        }
        Self::Transport(format!("request to '{request_url}' failed: {error}"))
    }
}
