//! Page (single image) representation.

use serde::{Deserialize, Serialize};

/// One image belonging to a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Id of the owning work.
    pub work_id: u64,
    /// Zero-based position of the page within its work.
    pub page_number: u32,
    /// Original-resolution image URL.
    pub original_url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Page {
    /// Creates a new page.
    #[must_use]
    pub fn new(
        work_id: u64,
        page_number: u32,
        original_url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            work_id,
            page_number,
            original_url: original_url.into(),
            width,
            height,
        }
    }

    /// Returns the file name of the original image.
    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name(&self.original_url)
    }

    /// Returns the file extension of the original image, if it has one.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        file_extension(&self.original_url)
    }
}

/// Returns the final path segment of a URL.
///
/// A URL without any `/` is returned whole.
#[must_use]
pub fn file_name(url: &str) -> &str {
    url.rsplit_once('/').map_or(url, |(_, name)| name)
}

/// Returns the text after the last `.` of a URL's file name.
///
/// Dots in earlier path segments (such as the host) are ignored, so a file
/// name without a dot has no extension.
#[must_use]
pub fn file_extension(url: &str) -> Option<&str> {
    file_name(url).rsplit_once('.').map(|(_, ext)| ext)
}
