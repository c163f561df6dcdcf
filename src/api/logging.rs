use crate::util::parse_bool_flag;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

const DEFAULT_LOG_PATH: &str = "/tmp/newsbrief.log";
const DEBUG_PAYLOAD_ENV: &str = "NEWSBRIEF_DEBUG_PAYLOAD";
const LOG_PATH_ENV: &str = "NEWSBRIEF_LOG_PATH";

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .and_then(parse_bool_flag)
        .unwrap_or(false)
}

pub fn emit_debug_payload(request_url: &str, payload: &Value) {
    let formatted_payload = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    let message = format!(
        "NEWSBRIEF DEBUG payload_request url={request_url}\npayload:\n{formatted_payload}\n"
    );
    emit_log_message(&message);
}

pub fn emit_sse_parse_error(json_data: &str, parse_error: &serde_json::Error) {
    let message =
        format!("NEWSBRIEF ERROR sse_parse_failed error={parse_error}\ndata:\n{json_data}\n");
    emit_log_message(&message);
}

pub fn emit_job_failure(job_id: u64, error: &dyn std::fmt::Display) {
    emit_log_message(&format!("NEWSBRIEF ERROR job_failed job={job_id} error={error}\n"));
}

pub fn emit_status_check_failure(error: &dyn std::fmt::Display) {
    emit_log_message(&format!(
        "NEWSBRIEF ERROR summarizer_status_failed error={error}\n"
    ));
}

pub fn emit_state_save_failure(path: &std::path::Path, error: &dyn std::fmt::Display) {
    emit_log_message(&format!(
        "NEWSBRIEF ERROR state_save_failed path={} error={error}\n",
        path.display()
    ));
}

fn emit_log_message(message: &str) {
    if let Some(path) = resolve_log_path() {
        if append_log_file(&path, message).is_ok() {
            return;
        }
    }

    eprintln!("{message}");
}

fn resolve_log_path() -> Option<String> {
    std::env::var(LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            // stderr belongs to the TUI while it is running
            if std::io::stderr().is_terminal() {
                Some(DEFAULT_LOG_PATH.to_string())
            } else {
                None
            }
        })
}

fn append_log_file(path: &str, message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(message.as_bytes())
}
