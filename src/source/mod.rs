//! Highlight sources.
//!
//! - [`goodlinks`] - the GoodLinks SQLite database

pub mod goodlinks;

pub use goodlinks::GoodLinksSource;
