//! Integration tests for the fetch pipeline using wiremock

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use futures::StreamExt;
use pixfetch_fetch::{FetchError, Fetcher, FetcherConfig, FetcherSlot, WorkPages};
use pixfetch_types::Work;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const USER: u64 = 42;
const BOOKMARKS_PATH: &str = "/ajax/user/42/illusts/bookmarks";

fn config(server: &MockServer) -> FetcherConfig {
    FetcherConfig::new("42_secret")
        .unwrap()
        .with_pool(8, Duration::from_millis(5))
        .with_base_url(server.uri())
}

fn fetcher(server: &MockServer) -> Fetcher {
    Fetcher::new(config(server)).unwrap()
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "error": false, "message": "", "body": body }))
}

fn query_u32(request: &Request, key: &str) -> u32 {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0)
}

fn bookmark_entry(id: u32) -> Value {
    json!({
        "id": id.to_string(),
        "title": format!("work {id}"),
        "illustType": 0,
        "url": format!("https://i.pximg.net/c/250x250/img-master/{id}_p0_square1200.jpg"),
        "tags": ["tag"],
        "userId": "7",
        "userName": "artist",
        "width": 100,
        "height": 100,
        "pageCount": 1,
        "isBookmarkable": true,
        "bookmarkData": { "id": (10_000 + id).to_string(), "private": false },
        "createDate": "2024-03-01T09:00:00+09:00",
        "updateDate": "2024-03-01T09:00:00+09:00",
        "isUnlisted": false
    })
}

/// Serves a listing of `total` bookmarks, honoring `offset` and `limit`.
async fn mount_listing(server: &MockServer, total: u32) {
    mount_slow_listing(server, total, None).await;
}

/// Like [`mount_listing`], delaying the slice at `slow.0` by `slow.1`.
async fn mount_slow_listing(server: &MockServer, total: u32, slow: Option<(u32, Duration)>) {
    Mock::given(method("GET"))
        .and(path(BOOKMARKS_PATH))
        .respond_with(move |request: &Request| {
            let offset = query_u32(request, "offset");
            let limit = query_u32(request, "limit");
            let end = total.min(offset.saturating_add(limit));
            let works: Vec<Value> = (offset..end).map(bookmark_entry).collect();
            let response = ok(json!({ "works": works, "total": total, "bookmarkTags": [] }));
            match slow {
                Some((slow_offset, delay)) if slow_offset == offset => response.set_delay(delay),
                _ => response,
            }
        })
        .mount(server)
        .await;
}

fn page_list(server: &MockServer, work_id: u64, pages: usize) -> Value {
    let entries: Vec<Value> = (0..pages)
        .map(|p| {
            json!({
                "urls": {
                    "thumb_mini": format!("{}/thumb/{work_id}_p{p}.jpg", server.uri()),
                    "original": format!("{}/img-original/img/2024/01/01/{work_id}_p{p}.png", server.uri())
                },
                "width": 640,
                "height": 480
            })
        })
        .collect();
    Value::Array(entries)
}

#[tokio::test]
async fn test_counted_fetch_yields_every_work() {
    let server = MockServer::start().await;
    mount_listing(&server, 250).await;
    let fetcher = fetcher(&server);

    let seen = Mutex::new(Vec::new());
    let observer = |f: f64| seen.lock().unwrap().push(f);

    let works: Vec<Work> = fetcher.bookmarks(250, Some(&observer)).collect().await;

    assert_eq!(works.len(), 250);
    let ids: HashSet<u64> = works.iter().map(Work::id).collect();
    assert_eq!(ids, (0..250).collect());
    assert!(works.iter().all(|w| matches!(w, Work::Bookmarked(_))));

    let progress = seen.into_inner().unwrap();
    assert_eq!(progress.first(), Some(&0.0));
    assert_eq!(progress.last(), Some(&1.0));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|f| (0.0..=1.0).contains(f)));

    let stats = fetcher.stats();
    assert_eq!(stats.admitted, 3);
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failures(), 0);
}

#[tokio::test]
async fn test_batches_arrive_in_completion_order() {
    let server = MockServer::start().await;
    mount_slow_listing(&server, 250, Some((0, Duration::from_millis(300)))).await;
    let fetcher = fetcher(&server);

    let batches: Vec<_> = fetcher.bookmark_batches(250, None).collect().await;

    let offsets: Vec<u32> = batches.iter().map(|b| b.batch.offset).collect();
    assert_eq!(offsets.len(), 3);
    assert_eq!(offsets.last(), Some(&0));
    assert!(batches.iter().all(|b| !b.had_error()));
}

#[tokio::test]
async fn test_slow_consumer_keeps_every_batch() {
    let server = MockServer::start().await;
    mount_slow_listing(&server, 200, Some((100, Duration::from_millis(100)))).await;
    let fetcher = Fetcher::new(config(&server).with_timeout(Duration::from_millis(400))).unwrap();

    let mut batches = std::pin::pin!(fetcher.bookmark_batches(200, None));
    let first = batches.next().await.unwrap();
    assert_eq!(first.batch.offset, 0);

    // Stop pulling for longer than the request timeout.
    tokio::time::sleep(Duration::from_millis(800)).await;

    let second = batches.next().await.unwrap();
    assert_eq!(second.batch.offset, 100);
    assert!(!second.had_error());
    assert_eq!(second.len(), 100);
    assert!(batches.next().await.is_none());

    let stats = fetcher.stats();
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failures(), 0);
}

#[tokio::test]
async fn test_all_bookmarks_uses_count() {
    let server = MockServer::start().await;
    mount_listing(&server, 120).await;
    let fetcher = fetcher(&server);

    assert_eq!(fetcher.bookmark_count().await, 120);

    let works: Vec<Work> = fetcher.all_bookmarks(None).collect().await;
    assert_eq!(works.len(), 120);
    // One count request per call plus two batches.
    assert_eq!(fetcher.stats().admitted, 4);
}

#[tokio::test]
async fn test_zero_count_issues_no_requests() {
    let server = MockServer::start().await;
    let fetcher = fetcher(&server);

    let seen = Mutex::new(Vec::new());
    let observer = |f: f64| seen.lock().unwrap().push(f);

    let works: Vec<Work> = fetcher.bookmarks(0, Some(&observer)).collect().await;

    assert!(works.is_empty());
    assert_eq!(seen.into_inner().unwrap(), vec![1.0]);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_batch_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKMARKS_PATH))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_listing(&server, 150).await;
    let fetcher = fetcher(&server);

    let batches: Vec<_> = fetcher.bookmark_batches(150, None).collect().await;

    assert_eq!(batches.len(), 2);
    let failed: Vec<_> = batches.iter().filter(|b| b.had_error()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].batch.offset, 100);
    assert!(failed[0].is_empty());

    let total: usize = batches.iter().map(|b| b.len()).sum();
    assert_eq!(total, 100);

    let stats = fetcher.stats();
    assert_eq!(stats.transport_failures, 1);
    assert_eq!(stats.succeeded, 1);
}

#[tokio::test]
async fn test_failed_batch_still_completes_progress() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKMARKS_PATH))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(503))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_listing(&server, 150).await;
    let fetcher = fetcher(&server);

    let seen = Mutex::new(Vec::new());
    let observer = |f: f64| seen.lock().unwrap().push(f);
    let works: Vec<Work> = fetcher.bookmarks(150, Some(&observer)).collect().await;

    assert_eq!(works.len(), 50);
    assert_eq!(seen.into_inner().unwrap().last(), Some(&1.0));
}

#[tokio::test]
async fn test_single_batch_with_personal_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKMARKS_PATH))
        .and(query_param("offset", "10"))
        .and(query_param("limit", "2"))
        .and(query_param("rest", "show"))
        .and(header("cookie", "PHPSESSID=42_secret;"))
        .respond_with(ok(json!({
            "works": [bookmark_entry(1), bookmark_entry(2)],
            "total": 12,
            "bookmarkTags": { "10001": ["mine", "favorite"] }
        })))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let batch = fetcher.bookmark_batch(10, 2).await.unwrap();

    assert!(!batch.had_error());
    assert_eq!(batch.len(), 2);
    assert_eq!(
        batch.works[0].personal_tags(),
        Some(&["mine".to_string(), "favorite".to_string()][..])
    );
    assert_eq!(batch.works[1].personal_tags(), Some(&[][..]));
    assert_eq!(fetcher.user_id(), USER);
}

#[tokio::test]
async fn test_empty_bookmark_tags_array() {
    let server = MockServer::start().await;
    mount_listing(&server, 3).await;
    let fetcher = fetcher(&server);

    let batch = fetcher.bookmark_batch(0, 3).await.unwrap();

    assert!(!batch.had_error());
    assert_eq!(batch.len(), 3);
    assert!(batch.works.iter().all(|w| w.personal_tags() == Some(&[][..])));
}

#[tokio::test]
async fn test_api_error_envelope_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKMARKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "Invalid user",
            "body": []
        })))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let batch = fetcher.bookmark_batch(0, 100).await.unwrap();
    assert!(batch.had_error());
    assert_eq!(fetcher.bookmark_count().await, 0);
    assert_eq!(fetcher.stats().api_failures, 2);
}

#[tokio::test]
async fn test_bookmark_batch_rejects_limit() {
    let server = MockServer::start().await;
    let fetcher = fetcher(&server);

    assert!(matches!(
        fetcher.bookmark_batch(0, 0).await,
        Err(FetchError::Batch(_))
    ));
    assert!(matches!(
        fetcher.bookmark_batch(0, 101).await,
        Err(FetchError::Batch(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_work_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/900"))
        .respond_with(ok(json!({
            "id": "900",
            "title": "detail",
            "illustType": 1,
            "createDate": "2024-01-01T00:00:00+00:00",
            "uploadDate": "2024-01-02T00:00:00+00:00",
            "urls": { "original": "https://i.pximg.net/img-original/img/900_p0.png" },
            "tags": { "tags": [{ "tag": "a" }, { "tag": "b" }] },
            "userId": 7,
            "userName": "artist",
            "width": 10,
            "height": 20,
            "pageCount": 1,
            "bookmarkCount": 3,
            "likeCount": 2,
            "commentCount": 0,
            "viewCount": 50,
            "isBookmarkable": true,
            "bookmarkData": null,
            "isUnlisted": false
        })))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let work = fetcher.work(900).await.unwrap();
    assert!(matches!(work, Work::Detailed(_)));
    assert_eq!(work.info().tags, vec!["a", "b"]);
    assert_eq!(work.info().bookmark_id(), 0);
    assert!(!work.info().is_public_bookmark());
    assert_eq!(work.stats().and_then(|s| s.views), Some(50));
}

#[tokio::test]
async fn test_missing_work_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    assert!(fetcher.work(404).await.is_none());
    assert_eq!(fetcher.stats().transport_failures, 1);
}

#[tokio::test]
async fn test_pages_in_source_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/77/pages"))
        .respond_with(ok(page_list(&server, 77, 3)))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let pages = fetcher.pages(77).await;
    assert_eq!(pages.len(), 3);
    let numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    assert_eq!(pages[2].file_name(), "77_p2.png");
    assert_eq!(pages[2].extension(), Some("png"));
}

#[tokio::test]
async fn test_pages_many_empty_ids() {
    let server = MockServer::start().await;
    let fetcher = fetcher(&server);

    let results: Vec<WorkPages> = fetcher.pages_many(Vec::new(), 4).collect().await;
    assert!(results.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pages_many_one_result_per_id() {
    let server = MockServer::start().await;
    for (id, count) in [(1u64, 1usize), (3, 2)] {
        Mock::given(method("GET"))
            .and(path(format!("/ajax/illust/{id}/pages")))
            .respond_with(ok(page_list(&server, id, count)))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/ajax/illust/2/pages"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let mut results: Vec<WorkPages> = fetcher.pages_many([1, 2, 3], 2).collect().await;
    results.sort_by_key(|r| r.work_id);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].pages.len(), 1);
    assert!(!results[0].had_error);
    assert!(results[1].pages.is_empty());
    assert!(results[1].had_error);
    assert_eq!(results[2].pages.len(), 2);
    assert!(results[2].pages.iter().all(|p| p.work_id == 3));
}

#[tokio::test]
async fn test_pages_many_zero_concurrency_still_completes() {
    let server = MockServer::start().await;
    for id in 1..=3u64 {
        Mock::given(method("GET"))
            .and(path(format!("/ajax/illust/{id}/pages")))
            .respond_with(ok(page_list(&server, id, 1)))
            .mount(&server)
            .await;
    }
    let fetcher = fetcher(&server);

    let results: Vec<WorkPages> = fetcher.pages_many(1..=3, 0).collect().await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.pages.len() == 1));
}

#[tokio::test]
async fn test_pages_many_spaces_admissions_by_scoped_limit() {
    let server = MockServer::start().await;
    for id in 1..=3u64 {
        Mock::given(method("GET"))
            .and(path(format!("/ajax/illust/{id}/pages")))
            .respond_with(ok(page_list(&server, id, 1)))
            .mount(&server)
            .await;
    }
    let interval = Duration::from_millis(200);
    let fetcher = Fetcher::new(config(&server).with_pool(8, interval)).unwrap();

    let start = std::time::Instant::now();
    let results: Vec<WorkPages> = fetcher.pages_many([1, 2, 3], 1).collect().await;

    // The pool alone admits all three at once; the limit of one per
    // interval holds back the second and third.
    assert!(start.elapsed() >= interval * 2);
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.had_error));
}

#[tokio::test]
async fn test_work_image_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/77/pages"))
        .respond_with(ok(page_list(&server, 77, 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img-original/img/2024/01/01/77_p0.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG image".to_vec()))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let (stream, name) = fetcher.work_image(77, 0).await.unwrap();
    let chunks: Vec<_> = stream.collect().await;
    let bytes: Vec<u8> = chunks
        .into_iter()
        .map(Result::unwrap)
        .flat_map(|chunk| chunk.to_vec())
        .collect();

    assert_eq!(name, "77_p0.png");
    assert_eq!(bytes, b"\x89PNG image");
    // Only the page list goes through the pool.
    assert_eq!(fetcher.stats().admitted, 1);
}

#[tokio::test]
async fn test_work_image_page_out_of_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/77/pages"))
        .respond_with(ok(page_list(&server, 77, 1)))
        .mount(&server)
        .await;
    let fetcher = fetcher(&server);

    let result = fetcher.work_image(77, 3).await;
    assert!(matches!(
        result,
        Err(FetchError::PageOutOfRange {
            work_id: 77,
            page: 3,
            available: 1
        })
    ));
}

#[tokio::test]
async fn test_slot_configures_once() {
    let server = MockServer::start().await;
    mount_listing(&server, 5).await;

    let slot = FetcherSlot::new();
    assert!(matches!(slot.get(), Err(FetchError::NotConfigured)));

    let config = FetcherConfig::new("42_secret")
        .unwrap()
        .with_base_url(server.uri());
    assert!(slot.try_configure(config.clone()));
    assert!(!slot.try_configure(config.clone()));
    assert!(matches!(
        slot.configure(config),
        Err(FetchError::AlreadyConfigured)
    ));

    assert_eq!(slot.get().unwrap().bookmark_count().await, 5);
}
