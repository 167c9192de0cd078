//! Utility functions shared by the pipeline stages.
//!
//! - **URL validation**: feed and endpoint URLs must be absolute http(s) URLs
//! - **Text processing**: single-line cleanup, Telegram Markdown escaping and
//!   char-boundary truncation

mod text;
mod url_validator;

pub use text::{escape_markdown, single_line, truncate_chars};
pub use url_validator::{validate_url, UrlValidationError};
