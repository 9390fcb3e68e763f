//! Sync command implementation.
//!
//! Loads the configuration, reads the GoodLinks database and hands the
//! highlights to the [`SyncRunner`]. The token check happens before the
//! database is touched.

use crate::config::{parse_since, SyncConfig};
use crate::error::{Error, Result};
use crate::readwise::{render_preview, ReadwiseClient};
use crate::source::GoodLinksSource;
use crate::sync::{SyncReport, SyncRunner};
use colored::Colorize;
use std::path::PathBuf;

/// Flags that shape a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncArgs<'a> {
    pub dry_run: bool,
    pub db: Option<&'a PathBuf>,
    pub since: Option<&'a str>,
    pub json: bool,
    pub quiet: bool,
}

/// Execute a sync run.
///
/// # Errors
///
/// Returns a configuration error for a live run without a token, a data
/// read error if GoodLinks cannot be read, or a submission error if Readwise
/// refuses the batch.
pub fn execute(args: &SyncArgs<'_>) -> Result<()> {
    let since = args.since.map(parse_since).transpose()?;
    let config = SyncConfig::from_env(args.dry_run, args.db.map(PathBuf::as_path), since)?;
    tracing::debug!(?config, "loaded configuration");

    let source = GoodLinksSource::open(&config.db_path)?;
    let highlights = source.fetch_highlights(config.since)?;

    let client = ReadwiseClient::new(&config)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    let report = rt.block_on(SyncRunner::new(&config, &client).run(&highlights))?;

    if args.json {
        let output = serde_json::json!({
            "success": true,
            "database": config.db_path.display().to_string(),
            "report": report,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if !args.quiet {
        print_report(&report, &config)?;
    }

    Ok(())
}

fn print_report(report: &SyncReport, config: &SyncConfig) -> Result<()> {
    if report.dry_run {
        println!(
            "{}",
            "DRY RUN MODE: No highlights will be posted.".yellow().bold()
        );
        println!();
    }

    if let Some(since) = config.since {
        println!("Only highlights made after {}", since.to_rfc3339());
    }

    if report.is_empty() {
        if report.found == 0 {
            println!("No highlights found.");
        } else {
            println!(
                "No highlights to sync ({} read, none with text).",
                report.found
            );
        }
        return Ok(());
    }

    print!("Found {} highlight(s)", report.found);
    if report.dropped() > 0 {
        print!(
            " ({} without text, {} duplicate)",
            report.skipped_empty, report.duplicates
        );
    }
    println!(".");
    println!();

    if let Some(preview) = &report.preview {
        println!("Would post the following payload to Readwise:");
        println!("{}", render_preview(preview)?);
        println!();
        println!(
            "{}",
            format!("DRY RUN: Would sync {} highlight(s) to Readwise.", report.sent)
                .as_str()
                .yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Successfully synced {} highlight(s) to Readwise.", report.sent)
            .as_str()
            .green()
    );
    if let Some(accepted) = report.accepted {
        println!("  Readwise reported {accepted} new or updated highlight(s).");
    }

    Ok(())
}
