//! Configuration file parser for the digest run.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which reproduces the stock two-feed digest. Unknown keys are accepted by
//! serde and logged as a warning so typos do not go unnoticed.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::util::validate_url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

pub const DEFAULT_FEEDS: &[&str] = &[
    "http://feeds.bbci.co.uk/news/rss.xml",
    "http://feeds.reuters.com/reuters/topNews",
];

pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Upper bound for `per_feed_limit`; the config can only lower it.
pub const MAX_PER_FEED_LIMIT: usize = 5;

/// Upper bound for `digest_limit`; the config can only lower it.
pub const MAX_DIGEST_LIMIT: usize = 8;

/// Settings for one digest run.
///
/// Built once at startup and handed to each pipeline stage. All fields use
/// `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed URLs, collected in this order.
    pub feeds: Vec<String>,

    /// Entries taken from the head of each feed.
    pub per_feed_limit: usize,

    /// Articles included in the digest, counted across all feeds.
    pub digest_limit: usize,

    /// Digest heading; the run date is appended after a `|`.
    pub title: String,

    /// Summarization inference endpoint (POST `{"inputs": ...}`).
    pub summarizer_url: String,

    /// Telegram Bot API base URL. Overridable so tests can point at a mock.
    pub telegram_api_base: String,

    /// Where the last digest is written. Overwritten on every run.
    pub output_path: PathBuf,

    /// Per-request timeout for every HTTP call.
    pub request_timeout_secs: u64,

    /// Summaries requested at once. 1 = strictly sequential.
    pub summary_concurrency: usize,

    /// Characters of article text sent to the summarizer. 0 = unlimited.
    pub max_summary_input_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            per_feed_limit: MAX_PER_FEED_LIMIT,
            digest_limit: MAX_DIGEST_LIMIT,
            title: "🌍 World in a Minute".to_string(),
            summarizer_url: DEFAULT_SUMMARIZER_URL.to_string(),
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            output_path: PathBuf::from("last_digest.md"),
            request_timeout_secs: 30,
            summary_concurrency: 1,
            max_summary_input_chars: 0,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 10] = [
        "feeds",
        "per_feed_limit",
        "digest_limit",
        "title",
        "summarizer_url",
        "telegram_api_base",
        "output_path",
        "request_timeout_secs",
        "summary_concurrency",
        "max_summary_input_chars",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    ///
    /// The result is not validated; call [`Config::validate`] once CLI
    /// overrides have been applied.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Checks the settings a run cannot proceed without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feeds.is_empty() {
            return Err(ConfigError::Invalid("no feeds configured".into()));
        }
        for feed in &self.feeds {
            validate_url(feed)
                .map_err(|e| ConfigError::Invalid(format!("feed '{feed}': {e}")))?;
        }
        validate_url(&self.summarizer_url)
            .map_err(|e| ConfigError::Invalid(format!("summarizer_url: {e}")))?;
        validate_url(&self.telegram_api_base)
            .map_err(|e| ConfigError::Invalid(format!("telegram_api_base: {e}")))?;

        if !(1..=MAX_PER_FEED_LIMIT).contains(&self.per_feed_limit) {
            return Err(ConfigError::Invalid(format!(
                "per_feed_limit must be between 1 and {MAX_PER_FEED_LIMIT}"
            )));
        }
        if !(1..=MAX_DIGEST_LIMIT).contains(&self.digest_limit) {
            return Err(ConfigError::Invalid(format!(
                "digest_limit must be between 1 and {MAX_DIGEST_LIMIT}"
            )));
        }
        if self.summary_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "summary_concurrency must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
