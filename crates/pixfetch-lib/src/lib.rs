//! Rate-limited bookmark and artwork metadata fetcher for pixiv.
//!
//! This is a facade crate that re-exports functionality from the pixfetch
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use pixfetch_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = FetcherSlot::global().configure(FetcherConfig::new("12345_secret")?)?;
//!
//!     let mut pages = std::pin::pin!(fetcher.pages_many([1001, 1002, 1003], 2));
//!     while let Some(result) = pages.next().await {
//!         println!("work {} has {} pages", result.work_id, result.pages.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use pixfetch_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use pixfetch_fetch::{
    BookmarkBatch, DEFAULT_POOL_INTERVAL, DEFAULT_POOL_SIZE, FetchError, FetchStats, Fetcher,
    FetcherConfig, FetcherSlot, ImageStream, PermitPool, ScopedLimit, StatsSnapshot, WorkPages,
    completion_order, flatten_works, url,
};

/// Prelude module for convenient imports.
///
/// ```
/// use pixfetch_lib::prelude::*;
/// ```
pub mod prelude {
    pub use pixfetch_types::{
        Batch, BatchError, BatchPlan, Page, Progress, Session, SessionError, Work, WorkInfo,
        WorkKind,
    };

    #[cfg(feature = "fetch")]
    pub use pixfetch_fetch::{
        BookmarkBatch, DEFAULT_POOL_INTERVAL, DEFAULT_POOL_SIZE, FetchError, Fetcher,
        FetcherConfig, FetcherSlot, StatsSnapshot, WorkPages,
    };
}
