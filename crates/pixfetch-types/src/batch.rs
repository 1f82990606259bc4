//! Batch descriptors and counted pagination plans.

use crate::BatchError;

/// Largest number of entries the bookmark listing returns for one request.
pub const BOOKMARK_PAGE_SIZE: u32 = 100;

/// One `(offset, limit)` slice of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Batch {
    /// Index of the first entry in the slice.
    pub offset: u32,
    /// Maximum number of entries in the slice.
    pub limit: u32,
}

impl Batch {
    /// Creates a batch descriptor, validating that `limit` is in `1..=BOOKMARK_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is zero or above the page size.
    pub const fn new(offset: u32, limit: u32) -> Result<Self, BatchError> {
        if limit == 0 || limit > BOOKMARK_PAGE_SIZE {
            return Err(BatchError::LimitOutOfRange {
                limit,
                max: BOOKMARK_PAGE_SIZE,
            });
        }
        Ok(Self { offset, limit })
    }

    /// Returns the offset one past the last entry in the slice.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.offset.saturating_add(self.limit)
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}

/// The batches covering `[0, total)` with a fixed page size.
///
/// Batch `i` is `(i * page_size, min(page_size, total - i * page_size))`.
/// Iterating yields batches in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    total: u32,
    page_size: u32,
    next_offset: u32,
}

impl BatchPlan {
    /// Creates a plan for `total` entries with the given page size.
    ///
    /// # Errors
    ///
    /// Returns an error if the page size is zero or above [`BOOKMARK_PAGE_SIZE`].
    pub const fn new(total: u32, page_size: u32) -> Result<Self, BatchError> {
        if page_size == 0 || page_size > BOOKMARK_PAGE_SIZE {
            return Err(BatchError::LimitOutOfRange {
                limit: page_size,
                max: BOOKMARK_PAGE_SIZE,
            });
        }
        Ok(Self {
            total,
            page_size,
            next_offset: 0,
        })
    }

    /// Creates a plan using the full bookmark listing page size.
    #[must_use]
    pub const fn bookmarks(total: u32) -> Self {
        Self {
            total,
            page_size: BOOKMARK_PAGE_SIZE,
            next_offset: 0,
        }
    }

    /// Returns the number of entries the plan covers.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the total number of batches in the plan.
    #[must_use]
    pub const fn batch_count(&self) -> usize {
        self.total.div_ceil(self.page_size) as usize
    }

    /// Returns true if the plan issues no requests.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl Iterator for BatchPlan {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_offset >= self.total {
            return None;
        }

        let limit = self.page_size.min(self.total - self.next_offset);
        let batch = Batch {
            offset: self.next_offset,
            limit,
        };
        self.next_offset += limit;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total.saturating_sub(self.next_offset)).div_ceil(self.page_size);
        (remaining as usize, Some(remaining as usize))
    }
}

impl ExactSizeIterator for BatchPlan {}
