//! Bookmark count command implementation.

use anyhow::Result;
use pixfetch_lib::prelude::*;

/// Print the number of public bookmarks of the logged-in user.
pub(crate) async fn count(fetcher: &Fetcher) -> Result<()> {
    let total = fetcher.bookmark_count().await;
    let stats = fetcher.stats();
    if stats.failures() > 0 {
        anyhow::bail!("Failed to fetch the bookmark count for user {}", fetcher.user_id());
    }
    println!("{total}");
    Ok(())
}
