//! Daily news digest: RSS headlines, machine summaries, one Telegram post.
//!
//! The binary wires these modules together through [`pipeline::run`]; they
//! are exposed as a library so integration tests can drive each stage.

pub mod config;
pub mod delivery;
pub mod digest;
pub mod feed;
pub mod pipeline;
pub mod secrets;
pub mod summarize;
pub mod util;
