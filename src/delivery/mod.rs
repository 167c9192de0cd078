//! Digest delivery: the Telegram channel post and the local archive copy.
//!
//! The two steps are independent. The archive is written whether or not the
//! post succeeded, so the file always holds the digest that was attempted.

mod archive;
mod telegram;

pub use archive::{write_digest, ArchiveError};
pub use telegram::{
    split_message, DeliveryError, TelegramClient, TelegramResponse, MAX_MESSAGE_CHARS,
};
