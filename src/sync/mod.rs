//! GoodLinks → Readwise synchronization.
//!
//! - **Mapping**: highlights → one Readwise batch, empty text dropped
//! - **Dedup**: SHA256 of `(text, source_url)` collapses repeats in a batch
//! - **Runner**: preview (dry run) or a single POST through a transport
//!
//! There is no local sync state. Every run sends everything it reads and
//! relies on Readwise matching highlights by text and source, so re-running
//! is safe but overlapping runs should be avoided.
//!
//! # Example
//!
//! ```ignore
//! use glr::sync::SyncRunner;
//!
//! let client = ReadwiseClient::new(&config)?;
//! let report = SyncRunner::new(&config, &client).run(&highlights).await?;
//! println!("sent {}", report.sent);
//! ```

mod hash;
mod runner;
mod types;

pub use hash::dedup_key;
pub use runner::{build_batch, SyncRunner};
pub use types::{MappedBatch, SyncReport};
