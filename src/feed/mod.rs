//! Feed collection: fetch RSS/Atom sources and turn their entries into articles.
//!
//! - [`parser`] - feed parsing using the `feed-rs` crate
//! - [`fetcher`] - sequential HTTP retrieval with a body size cap
//!
//! Collection is all-or-nothing: the first feed that cannot be fetched or
//! parsed aborts the run.

mod fetcher;
mod parser;

pub use fetcher::{collect, fetch_feed, CollectError, FetchError};
pub use parser::{parse_feed, ParsedEntry, ParsedFeed};

/// Joins an entry title and its summary into the text sent for summarization.
pub const FULL_TEXT_SEPARATOR: &str = ". ";

/// One feed entry prepared for the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// Display name of the feed the entry came from.
    pub source: String,
    /// `"<title>. <summary>"`, with an empty summary when the entry has none.
    pub full_text: String,
}

impl Article {
    pub fn from_entry(entry: ParsedEntry, source: &str) -> Self {
        let summary = entry.summary.unwrap_or_default();
        let full_text = format!("{}{}{}", entry.title, FULL_TEXT_SEPARATOR, summary);
        Self {
            title: entry.title,
            link: entry.link.unwrap_or_default(),
            source: source.to_string(),
            full_text,
        }
    }
}

/// Takes at most `limit` entries from the head of `feed`, in feed order.
pub fn articles_from_feed(feed: ParsedFeed, source: &str, limit: usize) -> Vec<Article> {
    feed.entries
        .into_iter()
        .take(limit)
        .map(|entry| Article::from_entry(entry, source))
        .collect()
}
