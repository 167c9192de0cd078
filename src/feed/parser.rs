use feed_rs::parser;

use crate::util::single_line;

/// Channel-level data kept from a parsed RSS/Atom document.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed display name, if the document declares one.
    pub title: Option<String>,
    /// Entries in document order.
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub title: String,
    pub link: Option<String>,
    pub summary: Option<String>,
}

pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, parser::ParseFeedError> {
    let feed = parser::parse(bytes)?;

    let title = feed
        .title
        .map(|t| single_line(&t.content).into_owned())
        .filter(|t| !t.is_empty());

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));
            let title = entry
                .title
                .map(|t| single_line(&t.content).into_owned())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string());

            ParsedEntry {
                title,
                link,
                summary,
            }
        })
        .collect();

    Ok(ParsedFeed { title, entries })
}
