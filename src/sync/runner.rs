//! The sync runner: map highlights, then preview or submit them.
//!
//! A run is a straight line. Highlights are mapped into one batch; a dry run
//! stops there and hands the batch back as a preview, a live run posts it
//! once through the transport. Nothing is retried.

use std::collections::HashSet;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::model::Highlight;
use crate::readwise::{map_highlight, CreateHighlightsRequest, HighlightTransport};
use crate::sync::hash::dedup_key;
use crate::sync::types::{MappedBatch, SyncReport};

/// Map highlights into a single request.
///
/// Keeps source order, drops highlights without text and collapses repeats
/// of the same `(text, source_url)` to their first occurrence.
#[must_use]
pub fn build_batch(highlights: &[Highlight]) -> MappedBatch {
    let mut batch = MappedBatch::default();
    let mut seen = HashSet::new();

    for highlight in highlights {
        let Some(mapped) = map_highlight(highlight) else {
            tracing::debug!(id = %highlight.id, "skipping highlight without text");
            batch.skipped_empty += 1;
            continue;
        };

        if !seen.insert(dedup_key(&mapped.text, mapped.source_url.as_deref())) {
            tracing::debug!(id = %highlight.id, "skipping duplicate highlight");
            batch.duplicates += 1;
            continue;
        }

        batch.request.highlights.push(mapped);
    }

    batch
}

/// Runs one sync against a transport.
pub struct SyncRunner<'a, T> {
    config: &'a SyncConfig,
    transport: &'a T,
}

impl<'a, T: HighlightTransport> SyncRunner<'a, T> {
    #[must_use]
    pub fn new(config: &'a SyncConfig, transport: &'a T) -> Self {
        Self { config, transport }
    }

    /// Sync `highlights`.
    ///
    /// In dry-run mode the transport is never called and the report carries
    /// the request that would have been sent.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the submission fails; in that case
    /// none of the highlights of this run were accepted.
    pub async fn run(&self, highlights: &[Highlight]) -> Result<SyncReport> {
        let MappedBatch {
            request,
            skipped_empty,
            duplicates,
        } = build_batch(highlights);

        let mut report = SyncReport {
            dry_run: self.config.dry_run,
            found: highlights.len(),
            skipped_empty,
            duplicates,
            ..SyncReport::default()
        };

        if request.is_empty() {
            tracing::info!(found = report.found, "no highlights to sync");
            return Ok(report);
        }

        report.sent = request.len();

        if self.config.dry_run {
            tracing::info!(count = report.sent, "dry run, not posting");
            report.preview = Some(request);
            return Ok(report);
        }

        report.accepted = self.submit(&request).await?;
        Ok(report)
    }

    async fn submit(&self, request: &CreateHighlightsRequest) -> Result<Option<usize>> {
        tracing::info!(count = request.len(), "posting highlights to Readwise");
        match self.transport.post_highlights(request).await {
            Ok(response) => {
                tracing::info!(
                    count = request.len(),
                    accepted = ?response.accepted,
                    "Readwise accepted submission"
                );
                Ok(response.accepted)
            }
            Err(e) => {
                tracing::debug!(count = request.len(), "submission failed: {e}");
                Err(e)
            }
        }
    }
}
