//! Rate-limited concurrent fetching for the pixfetch metadata fetcher.
//!
//! This crate provides the fetch pipeline:
//!
//! - [`PermitPool`] - Time-windowed admission shared by every request
//! - [`url`] - Web API endpoint construction
//! - [`Fetcher`] - HTTP client for bookmarks, works, pages and images
//! - [`FetcherSlot`] - Configure-once holder for a [`Fetcher`]
//! - [`Fetcher::bookmarks`] and [`Fetcher::pages_many`] - Completion-order streams
//! - [`FetchStats`] - Counters for requests whose failure was swallowed

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod map;
mod pool;
mod schema;
mod slot;
mod stats;
mod stream;
pub mod url;

pub use client::{Fetcher, FetcherConfig, ImageStream};
pub use error::FetchError;
pub use pool::{DEFAULT_POOL_INTERVAL, DEFAULT_POOL_SIZE, PermitPool, ScopedLimit};
pub use slot::FetcherSlot;
pub use stats::{FetchStats, StatsSnapshot};
pub use stream::{BookmarkBatch, WorkPages, completion_order, flatten_works};
