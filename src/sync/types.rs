//! Sync result types.

use serde::Serialize;

use crate::readwise::CreateHighlightsRequest;

/// Highlights mapped for one submission, plus what was left out and why.
#[derive(Debug, Clone, Default)]
pub struct MappedBatch {
    /// Request body, in source order.
    pub request: CreateHighlightsRequest,
    /// Highlights dropped for having no visible text.
    pub skipped_empty: usize,
    /// Highlights dropped as repeats of an earlier `(text, source_url)`.
    pub duplicates: usize,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Whether this was a preview.
    pub dry_run: bool,
    /// Highlights read from GoodLinks.
    pub found: usize,
    /// Highlights skipped for empty text.
    pub skipped_empty: usize,
    /// Highlights collapsed as in-batch duplicates.
    pub duplicates: usize,
    /// Highlights submitted, or that would be submitted in a dry run.
    pub sent: usize,
    /// Highlights Readwise reported as created or modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<usize>,
    /// Exact request body of a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<CreateHighlightsRequest>,
}

impl SyncReport {
    /// True when nothing was (or would have been) sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent == 0
    }

    /// Highlights read but not sent.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.skipped_empty + self.duplicates
    }
}
