mod api;

pub use api::{ErrorEnvelope, StreamEvent, Summary, SummarizerStatus, SummaryRequest};
