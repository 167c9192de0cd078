//! Article summarization through a remote inference service.
//!
//! A summarizer never aborts the run: callers receive a typed
//! [`SummarizeError`] and decide how to render it. The digest formatter
//! prints a fixed fallback for [`SummarizeError::NoSummary`] and the error
//! text for everything else.

mod huggingface;

pub use huggingface::HuggingFaceSummarizer;

use std::future::Future;
use thiserror::Error;

/// Text shown when the service answered but produced no summary.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable.";

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Transport-level failure (DNS, connection, TLS, timeout)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response whose body was not JSON
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// JSON that claims to hold results but does not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
    /// The service replied without a summary; carries its error message, if any
    #[error("no summary returned{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    NoSummary(Option<String>),
}

pub trait Summarizer {
    fn summarize(&self, text: &str) -> impl Future<Output = Result<String, SummarizeError>>;
}

/// Renders a summarization outcome as the line body shown in the digest.
pub fn render_summary(result: &Result<String, SummarizeError>) -> String {
    match result {
        Ok(summary) => summary.clone(),
        Err(SummarizeError::NoSummary(_)) => SUMMARY_UNAVAILABLE.to_string(),
        Err(e) => format!("Summarization failed: {e}"),
    }
}
