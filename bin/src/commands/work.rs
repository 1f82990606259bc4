//! Work detail command implementation.

use anyhow::{Context, Result};
use pixfetch_lib::prelude::*;

/// Print full detail of a single work as JSON.
pub(crate) async fn work(fetcher: &Fetcher, id: u64) -> Result<()> {
    let work = fetcher
        .work(id)
        .await
        .with_context(|| format!("Work {id} is not available"))?;
    println!("{}", serde_json::to_string_pretty(&work)?);
    Ok(())
}
