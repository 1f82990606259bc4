//! Bookmarks command implementation.
//!
//! Streams bookmarked works as batches complete and writes them once the
//! fetch has finished.

use crate::display::{Format, fraction_bar, fraction_position, write_records};
use anyhow::{Context, Result};
use futures::StreamExt;
use pixfetch_lib::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Fetch bookmarked works and write them to `output` or stdout.
pub(crate) async fn bookmarks(
    fetcher: &Fetcher,
    count: Option<u32>,
    format: Format,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let count = match count {
        Some(count) => count,
        None => fetcher.bookmark_count().await,
    };

    let progress = fraction_bar(quiet, format!("{count} bookmarks"))?;
    let observer = |fraction: f64| progress.set_position(fraction_position(fraction));

    let mut works: Vec<Work> = Vec::with_capacity(count as usize);
    let mut skipped_batches = 0usize;
    let mut batches = std::pin::pin!(fetcher.bookmark_batches(count, Some(&observer)));
    while let Some(batch) = batches.next().await {
        if batch.had_error() {
            skipped_batches += 1;
        }
        works.extend(batch.works);
    }

    let finish_msg = if skipped_batches > 0 {
        format!(
            "Fetched {} of {count} bookmarks ({skipped_batches} batches skipped due to errors)",
            works.len()
        )
    } else {
        format!("Fetched {} of {count} bookmarks", works.len())
    };
    progress.finish_with_message(finish_msg);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_records(&works, BufWriter::new(file), format)?;
            if !quiet {
                eprintln!("Output written to: {}", path.display());
            }
        }
        None => write_records(&works, std::io::stdout().lock(), format)?,
    }

    let stats = fetcher.stats();
    if stats.failures() > 0 && !quiet {
        eprintln!(
            "{} of {} requests failed ({} transport, {} api, {} decode)",
            stats.failures(),
            stats.admitted,
            stats.transport_failures,
            stats.api_failures,
            stats.decode_failures
        );
    }

    Ok(())
}
