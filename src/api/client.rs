use super::error::JobError;
use super::logging::{debug_payload_enabled, emit_debug_payload};
use crate::config::Config;
use crate::types::{SummarizerStatus, SummaryRequest};
use crate::util::{csrf_token_from_cookies, is_local_endpoint_url};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
#[cfg(test)]
use std::sync::Arc;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, JobError>> + Send>>;

const CHECK_SUMMARIZER_PATH: &str = "/api/check-summarizer/";
const NEWS_SUMMARY_PATH: &str = "/api/get-news-summary/";

#[cfg(test)]
pub trait MockStreamProducer: Send + Sync {
    fn create_mock_stream(&self, request: &SummaryRequest) -> Result<ByteStream, JobError>;

    fn summarizer_available(&self) -> Result<bool, JobError> {
        Ok(true)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cookies: Option<String>,
    #[cfg(test)]
    mock_stream_producer: Option<Arc<dyn MockStreamProducer>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookies: config.cookies.clone(),
            #[cfg(test)]
            mock_stream_producer: None,
        })
    }

    #[cfg(test)]
    pub fn new_mock(mock_producer: Arc<dyn MockStreamProducer>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "http://localhost:8000".to_string(),
            cookies: None,
            mock_stream_producer: Some(mock_producer),
        }
    }

    pub fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.base_url)
    }

    /// Asks the backend whether its summarizer is configured.
    pub async fn check_summarizer(&self) -> Result<bool, JobError> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_stream_producer {
                return producer.summarizer_available();
            }
        }

        let request_url = self.endpoint(CHECK_SUMMARIZER_PATH);
        let response = self
            .http
            .get(&request_url)
            .send()
            .await
            .map_err(|error| JobError::CapabilityCheckFailed(error.to_string()))?;
        let status: SummarizerStatus = response
            .json()
            .await
            .map_err(|error| JobError::CapabilityCheckFailed(error.to_string()))?;
        Ok(status.available)
    }

    /// Opens the streamed summary response. Non-2xx replies are rejected
    /// before any body bytes are read.
    pub async fn create_stream(&self, request: &SummaryRequest) -> Result<ByteStream, JobError> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_stream_producer {
                return producer.create_mock_stream(request);
            }
        }

        let request_url = self.endpoint(NEWS_SUMMARY_PATH);
        let csrf_token = self
            .cookies
            .as_deref()
            .map(csrf_token_from_cookies)
            .unwrap_or_default();

        if debug_payload_enabled() {
            if let Ok(payload) = serde_json::to_value(request) {
                emit_debug_payload(&request_url, &payload);
            }
        }

        let mut builder = self
            .http
            .post(&request_url)
            .header("content-type", "application/json")
            .header("x-csrftoken", csrf_token)
            .json(request);
        if let Some(cookies) = &self.cookies {
            builder = builder.header("cookie", cookies);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| JobError::from_transport(error, &request_url))?;
        if !response.status().is_success() {
            return Err(JobError::RequestRejected {
                status: response.status().as_u16(),
            });
        }

        let request_url_for_stream = request_url.clone();
        let stream = response.bytes_stream().map(move |item| {
            item.map_err(|error| JobError::from_transport(error, &request_url_for_stream))
        });
        Ok(Box::pin(stream))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
