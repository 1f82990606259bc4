//! Core types for the pixfetch bookmark and artwork metadata fetcher.
//!
//! This crate provides the data structures shared by the fetch pipeline and
//! its consumers:
//!
//! - [`Work`] - A published work, tagged by how much detail the source returned
//! - [`Page`] - One image belonging to a work
//! - [`Batch`] - One `(offset, limit)` slice of a paginated listing
//! - [`BatchPlan`] - The batches covering a counted listing
//! - [`Progress`] - Observer for fractional completion of a counted fetch
//! - [`Session`] - The session credential and the user id it carries

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod error;
mod page;
mod progress;
mod session;
mod work;

pub use batch::{BOOKMARK_PAGE_SIZE, Batch, BatchPlan};
pub use error::{BatchError, SessionError};
pub use page::{Page, file_extension, file_name};
pub use progress::{Progress, ProgressTracker};
pub use session::Session;
pub use work::{
    BookmarkRef, BookmarkedWork, DetailedWork, ListingWork, Owner, Work, WorkInfo, WorkKind,
    WorkStats,
};
