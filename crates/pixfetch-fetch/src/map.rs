//! Mapping of wire shapes onto the domain model.

use std::collections::HashMap;

use pixfetch_types::{
    BookmarkRef, BookmarkedWork, DetailedWork, ListingWork, Owner, Page, Work, WorkInfo, WorkKind,
    WorkStats,
};

use crate::schema::{BookmarkData, BookmarkEntry, BookmarksBody, PageEntry, WorkBody};

/// Maps every work of a bookmark listing slice, in source order.
pub(crate) fn bookmark_works(body: BookmarksBody) -> Vec<Work> {
    let BookmarksBody {
        works,
        bookmark_tags,
        ..
    } = body;

    works
        .into_iter()
        .map(|entry| bookmark_work(entry, &bookmark_tags))
        .collect()
}

/// Maps one bookmark listing entry.
///
/// Entries carrying bookmark data become [`Work::Bookmarked`] with their
/// personal tags looked up by bookmark id; anything else is a plain listing
/// summary.
fn bookmark_work(entry: BookmarkEntry, personal_tags: &HashMap<u64, Vec<String>>) -> Work {
    let bookmark = bookmark_ref(entry.bookmark_data);
    let info = WorkInfo {
        id: entry.id,
        title: entry.title,
        kind: WorkKind::from_code(entry.illust_type),
        tags: entry.tags,
        owner: Owner {
            id: entry.user_id,
            name: entry.user_name,
        },
        width: entry.width,
        height: entry.height,
        page_count: entry.page_count,
        bookmarkable: entry.is_bookmarkable,
        bookmark,
        created_at: entry.create_date,
        updated_at: entry.update_date,
        unlisted: entry.is_unlisted,
    };

    match bookmark {
        Some(bookmark) => Work::Bookmarked(BookmarkedWork {
            info,
            thumbnail_url: entry.url,
            personal_tags: personal_tags.get(&bookmark.id).cloned().unwrap_or_default(),
        }),
        None => Work::Listing(ListingWork {
            info,
            thumbnail_url: entry.url,
        }),
    }
}

/// Maps a work detail body.
pub(crate) fn detailed_work(body: WorkBody) -> Work {
    let info = WorkInfo {
        id: body.id,
        title: body.title,
        kind: WorkKind::from_code(body.illust_type),
        tags: body.tags.tags.into_iter().map(|t| t.tag).collect(),
        owner: Owner {
            id: body.user_id,
            name: body.user_name,
        },
        width: body.width,
        height: body.height,
        page_count: body.page_count,
        bookmarkable: body.is_bookmarkable,
        bookmark: bookmark_ref(body.bookmark_data),
        created_at: body.create_date,
        updated_at: body.upload_date,
        unlisted: body.is_unlisted,
    };

    Work::Detailed(DetailedWork {
        info,
        original_url: body.urls.original,
        stats: WorkStats {
            bookmarks: body.bookmark_count,
            likes: body.like_count,
            comments: body.comment_count,
            views: body.view_count,
        },
    })
}

/// Maps a page list, numbering pages by their position in the response.
pub(crate) fn pages(work_id: u64, entries: Vec<PageEntry>) -> Vec<Page> {
    entries
        .into_iter()
        .zip(0u32..)
        .map(|(entry, page_number)| {
            Page::new(
                work_id,
                page_number,
                entry.urls.original,
                entry.width,
                entry.height,
            )
        })
        .collect()
}

/// Bookmark ids are always positive, so an id of zero means no bookmark.
fn bookmark_ref(data: Option<BookmarkData>) -> Option<BookmarkRef> {
    data.filter(|d| d.id > 0).map(|d| BookmarkRef {
        id: d.id,
        public: !d.private,
    })
}
