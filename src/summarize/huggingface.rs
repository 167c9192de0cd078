use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::secrets::bearer;
use crate::summarize::{SummarizeError, Summarizer};
use crate::util::truncate_chars;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// Client for a Hugging Face style summarization endpoint.
///
/// POSTs `{"inputs": text}` with a bearer token and expects
/// `[{"summary_text": "..."}]` back.
pub struct HuggingFaceSummarizer {
    client: reqwest::Client,
    endpoint: String,
    token: SecretString,
    max_input_chars: usize,
}

impl HuggingFaceSummarizer {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: SecretString,
        max_input_chars: usize,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token,
            max_input_chars,
        }
    }
}

impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let inputs = truncate_chars(text, self.max_input_chars);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", bearer(&self.token))
            .json(&InferenceRequest { inputs })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        let result = parse_response(status, &body);
        if let Err(e) = &result {
            tracing::warn!(status = %status, error = %e, "Summarization failed");
        }
        result
    }
}

fn parse_response(status: reqwest::StatusCode, body: &[u8]) -> Result<String, SummarizeError> {
    let json: serde_json::Value = match serde_json::from_slice(body) {
        Ok(json) => json,
        Err(_) if !status.is_success() => {
            return Err(SummarizeError::HttpStatus(status.as_u16()))
        }
        Err(e) => return Err(SummarizeError::Decode(e.to_string())),
    };

    match json {
        serde_json::Value::Array(mut items) if !items.is_empty() => {
            let first: SummaryItem = serde_json::from_value(items.swap_remove(0))
                .map_err(|e| SummarizeError::Decode(e.to_string()))?;
            if first.summary_text.trim().is_empty() {
                return Err(SummarizeError::NoSummary(None));
            }
            Ok(first.summary_text)
        }
        other => {
            let detail = other
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string);
            Err(SummarizeError::NoSummary(detail))
        }
    }
}
