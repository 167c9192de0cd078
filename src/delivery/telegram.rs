use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Telegram rejects `sendMessage` text longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Transport-level failure. The request URL is stripped because it
    /// embeds the bot token.
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// Non-2xx response whose body was not a Bot API envelope
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The Bot API answered `ok: false`
    #[error("Telegram API error{}: {description}", .code.map(|c| format!(" {c}")).unwrap_or_default())]
    Api {
        code: Option<i64>,
        description: String,
    },
    /// Body was not JSON
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        DeliveryError::Network(e.without_url())
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// The Bot API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl TelegramResponse {
    /// Id of the posted message, when the API reported one.
    pub fn message_id(&self) -> Option<i64> {
        self.result
            .as_ref()
            .and_then(|r| r.get("message_id"))
            .and_then(|id| id.as_i64())
    }
}

/// Telegram Bot API client bound to one chat.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    bot_token: SecretString,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        bot_token: SecretString,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token,
            chat_id: chat_id.into(),
        }
    }

    /// Posts the digest, split into as many messages as the length limit
    /// requires. Parts go out in order; the first failure stops the rest.
    pub async fn send_digest(&self, text: &str) -> Result<Vec<TelegramResponse>, DeliveryError> {
        let parts = split_message(text, MAX_MESSAGE_CHARS);
        if parts.len() > 1 {
            tracing::info!(parts = parts.len(), "Digest exceeds message limit, splitting");
        }

        let mut responses = Vec::with_capacity(parts.len());
        for part in parts {
            responses.push(self.send_message(part).await?);
        }
        Ok(responses)
    }

    /// Sends one Markdown message with link previews disabled.
    pub async fn send_message(&self, text: &str) -> Result<TelegramResponse, DeliveryError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base,
            self.bot_token.expose_secret()
        );

        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
                parse_mode: "Markdown",
                disable_web_page_preview: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        let parsed: TelegramResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(DeliveryError::HttpStatus(status.as_u16())),
            Err(e) => return Err(DeliveryError::Decode(e.to_string())),
        };

        if !parsed.ok {
            let err = DeliveryError::Api {
                code: parsed.error_code,
                description: parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            };
            tracing::error!(status = %status, error = %err, "Telegram rejected message");
            return Err(err);
        }

        tracing::debug!(message_id = ?parsed.message_id(), "Telegram message sent");
        Ok(parsed)
    }
}

/// Splits `text` into parts of at most `max_chars` characters.
///
/// Cuts prefer blank-line boundaries so digest entries stay whole; a single
/// block longer than the limit is cut at a char boundary.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_chars {
        let hard_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let cut = rest[..hard_end]
            .rfind("\n\n")
            .map(|idx| idx + 2)
            .unwrap_or(hard_end);

        parts.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest);
    }
    parts
}
