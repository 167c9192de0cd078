//! One digest run: collect → summarize and format → deliver → persist.
//!
//! Every stage runs once, in order. Collection and archive failures end the
//! run; summarization failures are rendered inline; a delivery failure is
//! recorded in the [`RunReport`] after the digest has been persisted.
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::delivery::{
    write_digest, ArchiveError, DeliveryError, TelegramClient, TelegramResponse,
};
use crate::digest::{build_digest, Digest, DigestOptions};
use crate::feed::{collect, CollectError};
use crate::summarize::Summarizer;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Articles collected across all feeds, before the digest limit.
    pub collected: usize,
    pub digest: Digest,
    /// `None` when delivery was skipped.
    pub delivery: Option<Result<Vec<TelegramResponse>, DeliveryError>>,
    pub output_path: PathBuf,
}

impl RunReport {
    pub fn delivery_failed(&self) -> bool {
        matches!(self.delivery, Some(Err(_)))
    }
}

/// Builds the HTTP client shared by every stage.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}

/// Runs the digest pipeline once.
///
/// `telegram` is `None` for a dry run: the digest is built and persisted
/// but not posted. `date` is the date printed in the digest header.
pub async fn run<S: Summarizer>(
    config: &Config,
    client: &reqwest::Client,
    summarizer: &S,
    telegram: Option<&TelegramClient>,
    date: NaiveDate,
) -> Result<RunReport, PipelineError> {
    println!("Collecting news from {} feeds...", config.feeds.len());
    let articles = collect(client, &config.feeds, config.per_feed_limit).await?;

    println!("Collected {} articles. Summarizing...", articles.len());
    let digest = build_digest(
        &articles,
        summarizer,
        DigestOptions {
            title: &config.title,
            date,
            limit: config.digest_limit,
            concurrency: config.summary_concurrency,
        },
    )
    .await;
    tracing::info!(
        entries = digest.entries,
        failed_summaries = digest.failed_summaries,
        "Digest built"
    );

    let delivery = match telegram {
        Some(telegram) => {
            println!("Sending to Telegram...");
            let result = telegram.send_digest(&digest.text).await;
            match &result {
                Ok(responses) => println!("Sent {} message(s) to Telegram.", responses.len()),
                Err(e) => {
                    tracing::error!(error = %e, "Digest delivery failed");
                    println!("Delivery failed: {e}");
                }
            }
            Some(result)
        }
        None => {
            tracing::info!("Dry run, skipping Telegram delivery");
            None
        }
    };

    write_digest(&config.output_path, &digest.text)?;
    println!("Saved digest to {}", config.output_path.display());

    Ok(RunReport {
        collected: articles.len(),
        digest,
        delivery,
        output_path: config.output_path.clone(),
    })
}
