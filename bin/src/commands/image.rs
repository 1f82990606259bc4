//! Image download command implementation.

use anyhow::{Context, Result};
use futures::StreamExt;
use pixfetch_lib::prelude::*;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Download the original image of one page into `output_dir`.
pub(crate) async fn image(
    fetcher: &Fetcher,
    id: u64,
    page: usize,
    output_dir: &Path,
    quiet: bool,
) -> Result<()> {
    let (mut stream, name) = fetcher
        .work_image(id, page)
        .await
        .with_context(|| format!("Failed to fetch page {page} of work {id}"))?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let path = output_dir.join(&name);
    let mut file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Image download interrupted")?;
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;

    if !quiet {
        println!("Wrote {written} bytes to {}", path.display());
    }
    Ok(())
}
