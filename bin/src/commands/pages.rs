//! Page list command implementation.

use anyhow::Result;
use futures::StreamExt;
use pixfetch_lib::prelude::*;
use std::io::Write;

/// Print the pages of each work as NDJSON, in the order the lists arrive.
pub(crate) async fn pages(fetcher: &Fetcher, ids: Vec<u64>, max_concurrent: usize) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = Vec::new();

    let mut results = std::pin::pin!(fetcher.pages_many(ids, max_concurrent));
    while let Some(result) = results.next().await {
        if result.had_error {
            failed.push(result.work_id);
        }
        for page in &result.pages {
            serde_json::to_writer(&mut out, page)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    if !failed.is_empty() {
        failed.sort_unstable();
        eprintln!("Page lists could not be fetched for: {failed:?}");
    }
    Ok(())
}
