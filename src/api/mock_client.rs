use crate::api::client::{ByteStream, MockStreamProducer};
use crate::api::error::JobError;
use crate::types::SummaryRequest;
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::sync::{Arc, Mutex};

pub enum MockResponse {
    /// Raw body chunks, delivered as-is. With `stall` the stream never ends.
    Stream { chunks: Vec<String>, stall: bool },
    Rejected(u16),
    /// Chunks followed by a transport failure.
    Broken { chunks: Vec<String>, message: String },
}

impl MockResponse {
    pub fn events(lines: &[&str]) -> Self {
        Self::Stream {
            chunks: lines.iter().map(|line| data_line(line)).collect(),
            stall: false,
        }
    }

    pub fn stalled_after(lines: &[&str]) -> Self {
        Self::Stream {
            chunks: lines.iter().map(|line| data_line(line)).collect(),
            stall: true,
        }
    }
}

pub fn data_line(json: &str) -> String {
    format!("data: {json}\n\n")
}

#[derive(Clone)]
pub struct MockApiClient {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    requests: Arc<Mutex<Vec<SummaryRequest>>>,
    availability: Arc<Mutex<Option<Result<bool, String>>>>,
}

impl MockApiClient {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
            availability: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_availability(self, availability: Result<bool, String>) -> Self {
        *self.availability.lock().unwrap() = Some(availability);
        self
    }

    pub fn recorded_requests(&self) -> Vec<SummaryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl MockStreamProducer for MockApiClient {
    fn create_mock_stream(&self, request: &SummaryRequest) -> Result<ByteStream, JobError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut responses_guard = self.responses.lock().unwrap();
        if responses_guard.is_empty() {
            return Err(JobError::Transport(
                "MockApiClient: No more responses configured".to_string(),
            ));
        }

        match responses_guard.remove(0) {
            MockResponse::Rejected(status) => Err(JobError::RequestRejected { status }),
            MockResponse::Stream { chunks, stall } => {
                let body = stream::iter(into_byte_chunks(chunks));
                if stall {
                    Ok(Box::pin(body.chain(stream::pending())))
                } else {
                    Ok(Box::pin(body))
                }
            }
            MockResponse::Broken { chunks, message } => {
                let mut items = into_byte_chunks(chunks);
                items.push(Err(JobError::Transport(message)));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }

    fn summarizer_available(&self) -> Result<bool, JobError> {
        match self.availability.lock().unwrap().clone() {
            Some(Ok(available)) => Ok(available),
            Some(Err(message)) => Err(JobError::CapabilityCheckFailed(message)),
            None => Ok(true),
        }
    }
}

fn into_byte_chunks(chunks: Vec<String>) -> Vec<Result<Bytes, JobError>> {
    chunks.into_iter().map(|s| Ok(Bytes::from(s))).collect()
}
