//! CLI command implementations.

pub(crate) mod bookmarks;
pub(crate) mod count;
pub(crate) mod image;
pub(crate) mod pages;
pub(crate) mod work;
