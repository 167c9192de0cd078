use crate::feed::parser::{parse_feed, ParsedFeed};
use crate::feed::{articles_from_feed, Article};
use futures::StreamExt;
use thiserror::Error;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching a single feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Feed XML could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// A feed failed during collection. Carries the offending URL.
#[derive(Debug, Error)]
#[error("Failed to collect feed {url}: {source}")]
pub struct CollectError {
    pub url: String,
    #[source]
    pub source: FetchError,
}

/// Fetches every feed in order and returns their articles.
///
/// Feeds are fetched one after another. Each contributes at most
/// `per_feed_limit` entries, taken from the head of the feed. The result is
/// ordered by feed position in `feeds`, then by entry order within a feed.
///
/// # Errors
///
/// The first feed that fails to download or parse aborts collection with a
/// [`CollectError`]; articles gathered so far are discarded.
pub async fn collect(
    client: &reqwest::Client,
    feeds: &[String],
    per_feed_limit: usize,
) -> Result<Vec<Article>, CollectError> {
    let mut articles = Vec::new();

    for url in feeds {
        let feed = fetch_feed(client, url).await.map_err(|source| CollectError {
            url: url.clone(),
            source,
        })?;

        let source = feed.title.clone().unwrap_or_else(|| fallback_source(url));
        let entries = feed.entries.len();
        let batch = articles_from_feed(feed, &source, per_feed_limit);

        tracing::info!(
            feed = %url,
            source = %source,
            entries = entries,
            kept = batch.len(),
            "Collected feed"
        );
        articles.extend(batch);
    }

    Ok(articles)
}

/// Downloads and parses one feed.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<ParsedFeed, FetchError> {
    tracing::debug!(feed = %url, "Fetching feed");
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    parse_feed(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Feed display name used when the document has no title: the URL's host.
fn fallback_source(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
