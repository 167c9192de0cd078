//! API credentials read from the process environment.
//!
//! Each secret has a canonical variable name and a legacy short name. The
//! canonical name wins when both are set. Values are wrapped in
//! [`SecretString`] so they never reach logs through `Debug`.
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// A secret's canonical environment variable and its legacy alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvKey {
    pub canonical: &'static str,
    pub legacy: &'static str,
}

pub const SUMMARIZER_TOKEN: EnvKey = EnvKey {
    canonical: "HF_API_TOKEN",
    legacy: "HFTOKEN",
};

pub const TELEGRAM_BOT_TOKEN: EnvKey = EnvKey {
    canonical: "TELEGRAM_BOT_TOKEN",
    legacy: "TGBOT",
};

pub const TELEGRAM_CHAT_ID: EnvKey = EnvKey {
    canonical: "TELEGRAM_CHAT_ID",
    legacy: "TGCHAT",
};

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Missing environment variable {canonical} (or legacy {legacy})")]
    Missing {
        canonical: &'static str,
        legacy: &'static str,
    },
}

/// Telegram bot credentials.
pub struct TelegramCredentials {
    pub bot_token: SecretString,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Every credential a run needs, resolved up front.
///
/// `telegram` is `None` only when the run was started without delivery
/// (`--dry-run`).
pub struct Secrets {
    pub summarizer_token: SecretString,
    pub telegram: Option<TelegramCredentials>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("summarizer_token", &"[REDACTED]")
            .field("telegram", &self.telegram)
            .finish()
    }
}

impl Secrets {
    /// Reads secrets from the process environment.
    pub fn from_env(need_telegram: bool) -> Result<Self, SecretsError> {
        Self::from_lookup(need_telegram, |name| std::env::var(name).ok())
    }

    /// Reads secrets through `lookup`, which maps a variable name to its value.
    ///
    /// Blank values count as missing.
    pub fn from_lookup<F>(need_telegram: bool, lookup: F) -> Result<Self, SecretsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let summarizer_token = SecretString::from(require(&lookup, SUMMARIZER_TOKEN)?);

        let telegram = if need_telegram {
            Some(TelegramCredentials {
                bot_token: SecretString::from(require(&lookup, TELEGRAM_BOT_TOKEN)?),
                chat_id: require(&lookup, TELEGRAM_CHAT_ID)?,
            })
        } else {
            None
        };

        tracing::debug!(telegram = telegram.is_some(), "Resolved credentials");
        Ok(Self {
            summarizer_token,
            telegram,
        })
    }
}

fn require<F>(lookup: &F, key: EnvKey) -> Result<String, SecretsError>
where
    F: Fn(&str) -> Option<String>,
{
    let found = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(value) = found(key.canonical) {
        return Ok(value);
    }
    if let Some(value) = found(key.legacy) {
        tracing::debug!(
            legacy = key.legacy,
            canonical = key.canonical,
            "Using legacy environment variable name"
        );
        return Ok(value);
    }
    Err(SecretsError::Missing {
        canonical: key.canonical,
        legacy: key.legacy,
    })
}

/// Formats a bearer `Authorization` header value.
pub(crate) fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}
