use super::logging::emit_sse_parse_error;
use crate::types::{ErrorEnvelope, StreamEvent};

const DATA_PREFIX: &str = "data: ";

/// Splits the summary stream into lines and decodes `data: <json>` records.
///
/// Bytes are held until their terminating newline arrives, so a record (or a
/// multi-byte character) split across chunks is decoded exactly once.
#[derive(Default)]
pub struct StreamParser {
    buffer: Vec<u8>,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        let mut start = 0;

        while let Some(end) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let line_end = start + end;
            let line = String::from_utf8_lossy(&self.buffer[start..line_end]);
            if let Some(event) = decode_line(&line) {
                events.push(event);
            }
            start = line_end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        events
    }

    /// Decodes whatever is left once the stream has ended without a newline.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        if rest.is_empty() {
            return Vec::new();
        }
        decode_line(&String::from_utf8_lossy(&rest))
            .into_iter()
            .collect()
    }

    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line(raw: &str) -> Option<StreamEvent> {
    let line = raw.strip_suffix('\r').unwrap_or(raw);

    let Some(json_data) = line.strip_prefix(DATA_PREFIX) else {
        return decode_error_envelope(line);
    };

    match serde_json::from_str::<StreamEvent>(json_data) {
        Ok(event) => Some(event),
        Err(error) => {
            emit_sse_parse_error(json_data, &error);
            None
        }
    }
}

fn decode_error_envelope(line: &str) -> Option<StreamEvent> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str::<ErrorEnvelope>(trimmed)
        .ok()
        .and_then(ErrorEnvelope::into_event)
}
