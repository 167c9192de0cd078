//! Digest document assembly.
//!
//! The digest is Markdown in the flavour Telegram's legacy `Markdown` parse
//! mode accepts, and is also what gets written to the local archive file:
//!
//! ```text
//! # 🌍 World in a Minute | 18.10.2026
//!
//! **1. Headline**
//! *Source: BBC News*
//! 📌 Summary text
//! 🔗 [Read more](https://example.com/article)
//!
//! ```
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};

use crate::feed::Article;
use crate::summarize::{render_summary, Summarizer};
use crate::util::escape_markdown;

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const SUMMARY_MARKER: &str = "📌";
pub const LINK_MARKER: &str = "🔗";
pub const READ_MORE: &str = "Read more";

/// A finished digest plus counters for run reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub text: String,
    /// Articles included.
    pub entries: usize,
    /// Entries whose summary line holds a fallback instead of a summary.
    pub failed_summaries: usize,
}

/// Layout settings for [`build_digest`].
#[derive(Debug, Clone, Copy)]
pub struct DigestOptions<'a> {
    pub title: &'a str,
    pub date: NaiveDate,
    /// Maximum number of articles included.
    pub limit: usize,
    /// Summaries requested at once. Output order never depends on it.
    pub concurrency: usize,
}

pub fn header(title: &str, date: NaiveDate) -> String {
    format!(
        "# {} | {}\n\n",
        escape_markdown(title),
        date.format(DATE_FORMAT)
    )
}

/// Builds the digest from the first `options.limit` articles.
///
/// Each included article's `full_text` is summarized once. With
/// `concurrency > 1` several requests may be in flight, but results are
/// consumed in article order so entry numbering matches the input.
pub async fn build_digest<S: Summarizer>(
    articles: &[Article],
    summarizer: &S,
    options: DigestOptions<'_>,
) -> Digest {
    let selected = &articles[..articles.len().min(options.limit)];

    let summaries: Vec<_> = stream::iter(selected)
        .map(|article| summarizer.summarize(&article.full_text))
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut text = header(options.title, options.date);
    let mut failed_summaries = 0;

    for (i, (article, summary)) in selected.iter().zip(&summaries).enumerate() {
        if summary.is_err() {
            failed_summaries += 1;
        }
        push_entry(&mut text, i + 1, article, &render_summary(summary));
        tracing::debug!(
            index = i + 1,
            title = %article.title,
            summarized = summary.is_ok(),
            "Formatted digest entry"
        );
    }

    Digest {
        text,
        entries: selected.len(),
        failed_summaries,
    }
}

/// Feed-supplied text is escaped; the link target is left as-is.
fn push_entry(text: &mut String, number: usize, article: &Article, summary: &str) {
    text.push_str(&format!(
        "**{}. {}**\n",
        number,
        escape_markdown(&article.title)
    ));
    text.push_str(&format!("*Source: {}*\n", escape_markdown(&article.source)));
    text.push_str(&format!("{SUMMARY_MARKER} {}\n", escape_markdown(summary)));
    text.push_str(&format!(
        "{LINK_MARKER} [{READ_MORE}]({})\n\n",
        article.link
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::{SummarizeError, SUMMARY_UNAVAILABLE};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Echoes the first word of the input; counts calls.
    struct EchoSummarizer {
        calls: AtomicUsize,
    }

    impl EchoSummarizer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("sum({})", text.split('.').next().unwrap_or_default()))
        }
    }

    /// Later articles answer sooner, to expose ordering bugs.
    struct SlowFirstSummarizer;

    impl Summarizer for SlowFirstSummarizer {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            let n: u64 = text
                .trim_start_matches('t')
                .split('.')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(n * 5))).await;
            Ok(format!("s{n}"))
        }
    }

    struct FailingSummarizer;

    impl Summarizer for FailingSummarizer {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            if text.starts_with("t0") {
                Err(SummarizeError::NoSummary(None))
            } else {
                Err(SummarizeError::HttpStatus(500))
            }
        }
    }

    fn articles(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| Article {
                title: format!("t{i}"),
                link: format!("https://example.com/{i}"),
                source: "Feed".into(),
                full_text: format!("t{i}. body"),
            })
            .collect()
    }

    fn options(limit: usize, concurrency: usize) -> DigestOptions<'static> {
        DigestOptions {
            title: "Daily",
            date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            limit,
            concurrency,
        }
    }

    fn entry_count(text: &str) -> usize {
        text.lines()
            .filter(|l| l.starts_with("**") && l.ends_with("**"))
            .count()
    }

    #[tokio::test]
    async fn test_exact_layout() {
        let summarizer = EchoSummarizer::new();
        let digest = build_digest(&articles(2), &summarizer, options(8, 1)).await;

        let expected = "# Daily | 07.03.2024\n\n\
            **1. t0**\n*Source: Feed*\n📌 sum(t0)\n🔗 [Read more](https://example.com/0)\n\n\
            **2. t1**\n*Source: Feed*\n📌 sum(t1)\n🔗 [Read more](https://example.com/1)\n\n";
        assert_eq!(digest.text, expected);
        assert_eq!(digest.entries, 2);
        assert_eq!(digest.failed_summaries, 0);
    }

    #[tokio::test]
    async fn test_limit_caps_entries_and_calls() {
        let summarizer = EchoSummarizer::new();
        let digest = build_digest(&articles(20), &summarizer, options(8, 1)).await;

        assert_eq!(digest.entries, 8);
        assert_eq!(entry_count(&digest.text), 8);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 8);
        assert!(digest.text.contains("**8. t7**"));
        assert!(!digest.text.contains("t8"));
    }

    #[tokio::test]
    async fn test_fewer_articles_than_limit() {
        let summarizer = EchoSummarizer::new();
        let digest = build_digest(&articles(3), &summarizer, options(8, 1)).await;
        assert_eq!(digest.entries, 3);
    }

    #[tokio::test]
    async fn test_no_articles_yields_header_only() {
        let summarizer = EchoSummarizer::new();
        let digest = build_digest(&[], &summarizer, options(8, 1)).await;
        assert_eq!(digest.text, "# Daily | 07.03.2024\n\n");
        assert_eq!(digest.entries, 0);
    }

    #[tokio::test]
    async fn test_concurrent_summaries_keep_article_order() {
        let digest = build_digest(&articles(8), &SlowFirstSummarizer, options(8, 4)).await;

        let summaries: Vec<&str> = digest
            .text
            .lines()
            .filter_map(|l| l.strip_prefix("📌 "))
            .collect();
        assert_eq!(summaries, vec!["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
    }

    #[tokio::test]
    async fn test_markdown_markers_in_feed_text_are_escaped() {
        let article = Article {
            title: "Rates *rise* for my_bank".into(),
            link: "https://example.com/a_b".into(),
            source: "[Wire]".into(),
            full_text: "Rates *rise* for my_bank. body".into(),
        };
        let digest = build_digest(&[article], &EchoSummarizer::new(), options(8, 1)).await;

        let expected = "# Daily | 07.03.2024\n\n\
            **1. Rates \\*rise\\* for my\\_bank**\n\
            *Source: \\[Wire]*\n\
            📌 sum(Rates \\*rise\\* for my\\_bank)\n\
            🔗 [Read more](https://example.com/a_b)\n\n";
        assert_eq!(digest.text, expected);
    }

    #[tokio::test]
    async fn test_failures_render_inline_and_are_counted() {
        let digest = build_digest(&articles(2), &FailingSummarizer, options(8, 1)).await;

        assert_eq!(digest.failed_summaries, 2);
        assert!(digest.text.contains(&format!("📌 {SUMMARY_UNAVAILABLE}\n")));
        assert!(digest
            .text
            .contains("📌 Summarization failed: HTTP error: status 500\n"));
    }
}
