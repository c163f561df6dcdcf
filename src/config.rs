use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::is_local_endpoint_url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_LOOKBACK_MINUTES: &str = "60";
const DEFAULT_SUMMARY_TYPE: &str = "sentence";
const STATE_FILE_NAME: &str = "state.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub cookies: Option<String>,
    /// Raw lookback input; clamped when a job starts.
    pub lookback_minutes: String,
    pub summary_type: String,
    pub state_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let base_url =
            std::env::var("NEWSBRIEF_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let cookies = std::env::var("NEWSBRIEF_COOKIES").ok().and_then(|v| {
            if v.trim().is_empty() {
                None
            } else {
                Some(v)
            }
        });
        let lookback_minutes = std::env::var("NEWSBRIEF_LOOKBACK_MINUTES")
            .unwrap_or_else(|_| DEFAULT_LOOKBACK_MINUTES.to_string());
        let summary_type = std::env::var("NEWSBRIEF_SUMMARY_TYPE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SUMMARY_TYPE.to_string());
        let state_path = match std::env::var("NEWSBRIEF_STATE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_state_path()?,
        };

        Ok(Self {
            base_url,
            cookies,
            lookback_minutes,
            summary_type,
            state_path,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!(
                "Invalid NEWSBRIEF_URL '{}': expected http:// or https:// URL",
                self.base_url
            );
        }

        if !self.is_local_endpoint() && self.base_url.starts_with("http://") && self.cookies.is_some()
        {
            bail!(
                "Refusing to send cookies over plain http to non-local server '{}'",
                self.base_url
            );
        }

        Ok(())
    }

    fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.base_url)
    }
}

fn default_state_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set and NEWSBRIEF_STATE_PATH missing")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("newsbrief")
        .join(STATE_FILE_NAME))
}
