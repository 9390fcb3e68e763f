//! Data models.
//!
//! - Highlight: one excerpt read from the GoodLinks export

pub mod highlight;

pub use highlight::{non_empty, timestamp_from_unix_seconds, Highlight};
