//! Configuration module
//!
//! Addresses and timeouts for the two backend services. Values come from
//! the environment (optionally seeded by a `.env` file) with local defaults.

use std::env;
use std::time::Duration;

use anyhow::Context;

const UPLOAD_SERVICE_URL: &str = "http://localhost:3000";
const ANALYSIS_SERVICE_URL: &str = "http://localhost:3001";
const CONNECT_TIMEOUT_SECS: u64 = 30;
const READ_TIMEOUT_SECS: u64 = 30;
// Large payloads over slow links.
const UPLOAD_TIMEOUT_SECS: u64 = 300;

/// HTTP client configuration shared by both endpoint groups
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub upload_base_url: String,
    pub analysis_base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub upload_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            upload_base_url: UPLOAD_SERVICE_URL.to_string(),
            analysis_base_url: ANALYSIS_SERVICE_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(UPLOAD_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Config pointing at explicit base URLs, with default timeouts.
    pub fn new(upload_base_url: impl Into<String>, analysis_base_url: impl Into<String>) -> Self {
        Self {
            upload_base_url: normalize_base_url(&upload_base_url.into()),
            analysis_base_url: normalize_base_url(&analysis_base_url.into()),
            ..Self::default()
        }
    }

    /// Create config from environment: GUIDEPOST_UPLOAD_URL, GUIDEPOST_ANALYSIS_URL and
    /// GUIDEPOST_{CONNECT,READ,UPLOAD}_TIMEOUT_SECS.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upload_base_url = lookup("GUIDEPOST_UPLOAD_URL")
            .unwrap_or_else(|| UPLOAD_SERVICE_URL.to_string());
        let analysis_base_url = lookup("GUIDEPOST_ANALYSIS_URL")
            .unwrap_or_else(|| ANALYSIS_SERVICE_URL.to_string());

        validate_base_url("GUIDEPOST_UPLOAD_URL", &upload_base_url)?;
        validate_base_url("GUIDEPOST_ANALYSIS_URL", &analysis_base_url)?;

        let config = Self {
            upload_base_url: normalize_base_url(&upload_base_url),
            analysis_base_url: normalize_base_url(&analysis_base_url),
            connect_timeout: secs(&lookup, "GUIDEPOST_CONNECT_TIMEOUT_SECS", CONNECT_TIMEOUT_SECS)?,
            read_timeout: secs(&lookup, "GUIDEPOST_READ_TIMEOUT_SECS", READ_TIMEOUT_SECS)?,
            upload_timeout: secs(&lookup, "GUIDEPOST_UPLOAD_TIMEOUT_SECS", UPLOAD_TIMEOUT_SECS)?,
        };
        config.warn_plain_http();
        Ok(config)
    }

    fn warn_plain_http(&self) {
        for url in [&self.upload_base_url, &self.analysis_base_url] {
            if url.starts_with("http://") {
                tracing::warn!(url = %url, "Service configured without TLS");
            }
        }
    }
}

fn secs<F>(lookup: &F, key: &str, default: u64) -> anyhow::Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds", key))?;
            Ok(Duration::from_secs(value))
        }
        None => Ok(Duration::from_secs(default)),
    }
}

fn validate_base_url(key: &str, url: &str) -> anyhow::Result<()> {
    let trimmed = url.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow::anyhow!(
            "{} must be an http(s) URL, got '{}'",
            key,
            trimmed
        ));
    }
    Ok(())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
