//! Completion-order streaming of bookmark batches and page lists.

use std::future::Future;

use futures::stream::{self, Stream, StreamExt};
use pixfetch_types::{Batch, BatchPlan, Page, Progress, ProgressTracker, Work};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, debug, instrument};

use crate::pool::ScopedLimit;
use crate::schema::{BookmarksBody, PageEntry};
use crate::url::{bookmarks_url, pages_url};
use crate::{FetchError, Fetcher, map};

/// The works of a single bookmark listing batch.
#[derive(Debug, Clone)]
pub struct BookmarkBatch {
    /// The slice of the listing this batch covers.
    pub batch: Batch,
    /// The works in this batch, in listing order.
    pub works: Vec<Work>,
    /// Whether this batch had an error that was skipped.
    pub had_error: bool,
}

impl BookmarkBatch {
    /// Creates a new bookmark batch.
    #[must_use]
    pub const fn new(batch: Batch, works: Vec<Work>) -> Self {
        Self {
            batch,
            works,
            had_error: false,
        }
    }

    /// Creates a new bookmark batch that represents a skipped error.
    #[must_use]
    pub const fn skipped_error(batch: Batch) -> Self {
        Self {
            batch,
            works: Vec::new(),
            had_error: true,
        }
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    /// Returns the number of works in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.works.len()
    }

    /// Returns true if this batch had an error that was skipped.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.had_error
    }
}

/// The pages of one work, as yielded by [`Fetcher::pages_many`].
#[derive(Debug, Clone)]
pub struct WorkPages {
    /// The work id.
    pub work_id: u64,
    /// The pages in source order. Empty when the work has no data.
    pub pages: Vec<Page>,
    /// Whether the page list request failed.
    pub had_error: bool,
}

/// Spawns every unit on the Tokio runtime and streams each result as soon as
/// its unit finishes.
///
/// Every unit is yielded exactly once. Submission order is not preserved.
/// Units keep running whether or not the stream is being polled; once the
/// stream is dropped their results are discarded.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn completion_order<I, T>(units: I) -> impl Stream<Item = T>
where
    I: IntoIterator,
    I::Item: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let units: Vec<_> = units.into_iter().collect();
    // One slot per unit, so a finished unit never waits on the consumer.
    let (tx, rx) = mpsc::channel(units.len().max(1));
    for unit in units {
        let tx = tx.clone();
        tokio::spawn(
            async move {
                // Fails only once the stream has been dropped.
                let _ = tx.send(unit.await).await;
            }
            .in_current_span(),
        );
    }
    ReceiverStream::new(rx)
}

/// Flattens a bookmark batch stream into individual works.
pub fn flatten_works(
    batch_stream: impl Stream<Item = BookmarkBatch>,
) -> impl Stream<Item = Work> {
    batch_stream.flat_map(|batch| stream::iter(batch.works))
}

impl Fetcher {
    /// Fetches one slice of the bookmark listing.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Batch`] if `limit` is not in `1..=100`. A failed
    /// request is not an error: it yields an empty batch with `had_error` set.
    #[instrument(skip(self))]
    pub async fn bookmark_batch(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<BookmarkBatch, FetchError> {
        let batch = Batch::new(offset, limit)?;
        Ok(self.fetch_bookmark_batch(batch).await)
    }

    /// Streams the first `count` bookmarks as batches, in completion order.
    ///
    /// All batches are spawned at once and admitted through the permit
    /// pool; they complete even while the stream is not being polled.
    /// `progress` receives the fraction of `count` emitted so far after
    /// every batch and `1.0` once the stream ends.
    pub fn bookmark_batches<'a>(
        &'a self,
        count: u32,
        progress: Option<&'a dyn Progress>,
    ) -> impl Stream<Item = BookmarkBatch> + 'a {
        let plan = BatchPlan::bookmarks(count);
        debug!(count, batches = plan.batch_count(), "submitting bookmark batches");

        let pending = completion_order(plan.map(|batch| {
            let fetcher = self.clone();
            async move { fetcher.fetch_bookmark_batch(batch).await }
        }));
        let tracker = ProgressTracker::new(progress, u64::from(count));

        stream::unfold(
            (pending, tracker, false),
            |(mut pending, mut tracker, started)| async move {
                if !started {
                    tracker.start();
                }
                match pending.next().await {
                    Some(batch) => {
                        tracker.advance(batch.len());
                        Some((batch, (pending, tracker, true)))
                    }
                    None => {
                        tracker.finish();
                        None
                    }
                }
            },
        )
    }

    /// Streams the first `count` bookmarked works, batch by batch in
    /// completion order.
    ///
    /// Failed batches contribute no works; see [`Fetcher::stats`] for how
    /// many requests failed.
    pub fn bookmarks<'a>(
        &'a self,
        count: u32,
        progress: Option<&'a dyn Progress>,
    ) -> impl Stream<Item = Work> + 'a {
        flatten_works(self.bookmark_batches(count, progress))
    }

    /// Streams every bookmarked work, using [`Fetcher::bookmark_count`] as
    /// the count.
    pub fn all_bookmarks<'a>(
        &'a self,
        progress: Option<&'a dyn Progress>,
    ) -> impl Stream<Item = Work> + 'a {
        stream::once(self.bookmark_count()).flat_map(move |count| self.bookmarks(count, progress))
    }

    /// Gets the pages of a work in source order.
    ///
    /// Returns an empty list if the work has no pages or the request fails.
    #[instrument(skip(self))]
    pub async fn pages(&self, work_id: u64) -> Vec<Page> {
        self.fetch_pages(work_id, None).await.pages
    }

    /// Streams the pages of many works, one [`WorkPages`] per id in
    /// completion order.
    ///
    /// Besides the shared permit pool, at most `max_concurrent` of these
    /// requests are admitted per pool interval. A value of zero is treated
    /// as one. An empty id list yields an empty stream and sends nothing.
    pub fn pages_many<'a>(
        &'a self,
        ids: impl IntoIterator<Item = u64>,
        max_concurrent: usize,
    ) -> impl Stream<Item = WorkPages> + 'a {
        self.submit_pages(ids.into_iter().collect(), max_concurrent)
    }

    fn submit_pages(
        &self,
        ids: Vec<u64>,
        max_concurrent: usize,
    ) -> impl Stream<Item = WorkPages> + '_ {
        let limit = ScopedLimit::new(max_concurrent);
        debug!(
            works = ids.len(),
            max_concurrent = limit.capacity(),
            "submitting page requests"
        );

        completion_order(ids.into_iter().map(move |work_id| {
            let fetcher = self.clone();
            let limit = limit.clone();
            async move { fetcher.fetch_pages(work_id, Some(&limit)).await }
        }))
    }

    async fn fetch_bookmark_batch(&self, batch: Batch) -> BookmarkBatch {
        let url = bookmarks_url(&self.config().base_url, self.user_id(), batch);
        match self.fetch_json::<BookmarksBody>(&url, None).await {
            Ok(body) => {
                let works = map::bookmark_works(body);
                debug!(%batch, works = works.len(), "bookmark batch completed");
                BookmarkBatch::new(batch, works)
            }
            Err(_) => BookmarkBatch::skipped_error(batch),
        }
    }

    async fn fetch_pages(&self, work_id: u64, scoped: Option<&ScopedLimit>) -> WorkPages {
        let url = pages_url(&self.config().base_url, work_id);
        let (pages, had_error) = match self.fetch_json::<Vec<PageEntry>>(&url, scoped).await {
            Ok(entries) => (map::pages(work_id, entries), false),
            Err(_) => (Vec::new(), true),
        };
        WorkPages {
            work_id,
            pages,
            had_error,
        }
    }
}
