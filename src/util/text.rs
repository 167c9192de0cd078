use std::borrow::Cow;

/// Collapses a string onto a single line.
///
/// Control characters (including newlines and tabs) become spaces, runs of
/// whitespace collapse to one space, and the result is trimmed. Feed titles
/// often carry stray line breaks that would otherwise split a digest entry.
///
/// Returns `Cow::Borrowed` when the input is already clean.
///
/// # Examples
///
/// ```
/// use newsdigest::util::single_line;
///
/// assert_eq!(single_line("Plain title"), "Plain title");
/// assert_eq!(single_line("  Split\n   title\t"), "Split title");
/// ```
pub fn single_line(s: &str) -> Cow<'_, str> {
    let trimmed = s.trim();
    let clean = trimmed.len() == s.len()
        && !trimmed.contains("  ")
        && !trimmed.chars().any(char::is_control);
    if clean {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(trimmed.len());
    for word in trimmed
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    Cow::Owned(out)
}

/// Characters Telegram's legacy `Markdown` mode treats as entity markers.
const MARKDOWN_SPECIALS: [char; 4] = ['_', '*', '`', '['];

/// Escapes text for Telegram's legacy `Markdown` parse mode.
///
/// Each of `_ * ` [` gets a leading backslash, so an unpaired marker in a
/// headline cannot make the Bot API reject the whole message.
///
/// # Examples
///
/// ```
/// use newsdigest::util::escape_markdown;
///
/// assert_eq!(escape_markdown("plain"), "plain");
/// assert_eq!(escape_markdown("snake_case [1]"), "snake\\_case \\[1]");
/// ```
pub fn escape_markdown(s: &str) -> Cow<'_, str> {
    if !s.contains(MARKDOWN_SPECIALS) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Truncates a string to at most `max_chars` characters, on a char boundary.
///
/// `max_chars == 0` means "no limit" and returns the input unchanged.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return s;
    }
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_borrows_clean_input() {
        assert!(matches!(single_line("Clean title"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_single_line_strips_control_chars() {
        assert_eq!(single_line("Bad\x1b[31m title\x07"), "Bad [31m title");
        assert_eq!(single_line("a\r\nb"), "a b");
    }

    #[test]
    fn test_single_line_empty() {
        assert_eq!(single_line("   "), "");
        assert_eq!(single_line(""), "");
    }

    #[test]
    fn test_escape_markdown_borrows_clean_input() {
        assert!(matches!(escape_markdown("Nothing to escape."), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_markdown_all_specials() {
        assert_eq!(
            escape_markdown("a_b *c* `d` [e]"),
            "a\\_b \\*c\\* \\`d\\` \\[e]"
        );
    }

    #[test]
    fn test_truncate_chars_zero_is_unlimited() {
        assert_eq!(truncate_chars("hello", 0), "hello");
    }

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }

    #[test]
    fn test_truncate_chars_multibyte_boundary() {
        assert_eq!(truncate_chars("Мир за минуту", 3), "Мир");
        assert_eq!(truncate_chars("🌍🌍🌍", 2), "🌍🌍");
    }
}
