//! Web API URL construction.

use pixfetch_types::Batch;

/// Base URL of the web API.
pub const BASE_URL: &str = "https://www.pixiv.net";

/// Builds the URL for one slice of a user's public bookmark listing.
///
/// URL format: `{base}/ajax/user/{USER}/illusts/bookmarks?tag=&offset={OFFSET}&limit={LIMIT}&rest=show`
///
/// # Example
///
/// ```
/// use pixfetch_fetch::url::{BASE_URL, bookmarks_url};
/// use pixfetch_types::Batch;
///
/// let url = bookmarks_url(BASE_URL, 42, Batch::new(100, 50).unwrap());
/// assert_eq!(
///     url,
///     "https://www.pixiv.net/ajax/user/42/illusts/bookmarks?tag=&offset=100&limit=50&rest=show"
/// );
/// ```
#[must_use]
pub fn bookmarks_url(base: &str, user_id: u64, batch: Batch) -> String {
    format!(
        "{}/ajax/user/{}/illusts/bookmarks?tag=&offset={}&limit={}&rest=show",
        base.trim_end_matches('/'),
        user_id,
        batch.offset,
        batch.limit
    )
}

/// Builds the detail URL of a single work.
#[must_use]
pub fn work_url(base: &str, work_id: u64) -> String {
    format!("{}/ajax/illust/{}", base.trim_end_matches('/'), work_id)
}

/// Builds the page list URL of a single work.
#[must_use]
pub fn pages_url(base: &str, work_id: u64) -> String {
    format!("{}/ajax/illust/{}/pages", base.trim_end_matches('/'), work_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmarks_url() {
        let url = bookmarks_url(BASE_URL, 1234, Batch::new(0, 1).unwrap());
        assert_eq!(
            url,
            "https://www.pixiv.net/ajax/user/1234/illusts/bookmarks?tag=&offset=0&limit=1&rest=show"
        );
    }

    #[test]
    fn test_work_url() {
        assert_eq!(
            work_url(BASE_URL, 98765),
            "https://www.pixiv.net/ajax/illust/98765"
        );
    }

    #[test]
    fn test_pages_url_trailing_slash() {
        assert_eq!(
            pages_url("http://127.0.0.1:8080/", 5),
            "http://127.0.0.1:8080/ajax/illust/5/pages"
        );
    }
}
