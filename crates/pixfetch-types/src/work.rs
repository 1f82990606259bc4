//! Work (published item) representation.
//!
//! The source returns works in several shapes carrying different subsets of
//! metadata. [`Work`] tags each value with the shape it came from; the fields
//! every shape carries live in [`WorkInfo`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a published work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkKind {
    /// Single or multi-page illustration.
    Illustration,
    /// Manga.
    Manga,
    /// Any other kind, keeping the source's numeric code.
    Other(u8),
}

impl WorkKind {
    /// Maps the source's numeric kind code.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Illustration,
            1 => Self::Manga,
            other => Self::Other(other),
        }
    }

    /// Returns the source's numeric kind code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Illustration => 0,
            Self::Manga => 1,
            Self::Other(code) => *code,
        }
    }
}

impl std::fmt::Display for WorkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Illustration => write!(f, "illustration"),
            Self::Manga => write!(f, "manga"),
            Self::Other(code) => write!(f, "other({code})"),
        }
    }
}

/// The user who published a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// User id.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// The viewer's bookmark of a work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRef {
    /// Bookmark id. Always positive.
    pub id: u64,
    /// Whether the bookmark is publicly visible.
    pub public: bool,
}

/// Fields every work shape carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInfo {
    /// Work id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Kind of work.
    pub kind: WorkKind,
    /// Public tags, in source order.
    pub tags: Vec<String>,
    /// Publisher.
    pub owner: Owner,
    /// Width in pixels of the first page.
    pub width: u32,
    /// Height in pixels of the first page.
    pub height: u32,
    /// Number of pages.
    pub page_count: u32,
    /// Whether the viewer may bookmark the work.
    pub bookmarkable: bool,
    /// The viewer's bookmark, if the work is bookmarked.
    pub bookmark: Option<BookmarkRef>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Whether the work is unlisted.
    pub unlisted: bool,
}

impl WorkInfo {
    /// Returns the bookmark id, or `0` when the work is not bookmarked.
    #[must_use]
    pub fn bookmark_id(&self) -> u64 {
        self.bookmark.map_or(0, |b| b.id)
    }

    /// Returns true if the work is bookmarked publicly.
    #[must_use]
    pub fn is_public_bookmark(&self) -> bool {
        self.bookmark.is_some_and(|b| b.public)
    }
}

/// Engagement counters from the full-detail shape.
///
/// A counter the source omitted is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkStats {
    /// Number of bookmarks.
    pub bookmarks: Option<u64>,
    /// Number of likes.
    pub likes: Option<u64>,
    /// Number of comments.
    pub comments: Option<u64>,
    /// Number of views.
    pub views: Option<u64>,
}

/// A work as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingWork {
    /// Shared fields.
    #[serde(flatten)]
    pub info: WorkInfo,
    /// Thumbnail URL.
    pub thumbnail_url: String,
}

/// A work from the viewer's bookmark listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkedWork {
    /// Shared fields.
    #[serde(flatten)]
    pub info: WorkInfo,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// The viewer's own tags on the bookmark.
    pub personal_tags: Vec<String>,
}

/// A work fetched individually with full detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedWork {
    /// Shared fields.
    #[serde(flatten)]
    pub info: WorkInfo,
    /// Original-resolution URL of the first page.
    pub original_url: Option<String>,
    /// Engagement counters.
    pub stats: WorkStats,
}

/// A published work, tagged by the shape it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Work {
    /// Listing summary.
    Listing(ListingWork),
    /// Bookmark listing entry with personal tags.
    Bookmarked(BookmarkedWork),
    /// Full detail.
    Detailed(DetailedWork),
}

impl Work {
    /// Returns the fields shared by every shape.
    #[must_use]
    pub const fn info(&self) -> &WorkInfo {
        match self {
            Self::Listing(w) => &w.info,
            Self::Bookmarked(w) => &w.info,
            Self::Detailed(w) => &w.info,
        }
    }

    /// Returns the work id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.info().id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.info().title
    }

    /// Returns the thumbnail URL, when the shape carries one.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        match self {
            Self::Listing(w) => Some(&w.thumbnail_url),
            Self::Bookmarked(w) => Some(&w.thumbnail_url),
            Self::Detailed(_) => None,
        }
    }

    /// Returns the original-resolution URL, when the shape carries one.
    #[must_use]
    pub fn original_url(&self) -> Option<&str> {
        match self {
            Self::Detailed(w) => w.original_url.as_deref(),
            Self::Listing(_) | Self::Bookmarked(_) => None,
        }
    }

    /// Returns the personal tags, when the shape carries them.
    #[must_use]
    pub fn personal_tags(&self) -> Option<&[String]> {
        match self {
            Self::Bookmarked(w) => Some(&w.personal_tags),
            Self::Listing(_) | Self::Detailed(_) => None,
        }
    }

    /// Returns the engagement counters, when the shape carries them.
    #[must_use]
    pub const fn stats(&self) -> Option<&WorkStats> {
        match self {
            Self::Detailed(w) => Some(&w.stats),
            Self::Listing(_) | Self::Bookmarked(_) => None,
        }
    }
}
