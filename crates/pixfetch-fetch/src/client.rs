//! HTTP client for the web API.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use pixfetch_types::{Batch, Page, Session, SessionError, Work};
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::pool::{DEFAULT_POOL_INTERVAL, DEFAULT_POOL_SIZE, PermitPool, ScopedLimit};
use crate::schema::{BookmarksBody, Envelope, WorkBody};
use crate::stats::{FetchStats, StatsSnapshot};
use crate::url::{BASE_URL, bookmarks_url, work_url};
use crate::{FetchError, map};

/// Browser user agent sent with every request; the API rejects unknown clients.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.11; rv:43.0) Gecko/20100101 Firefox/43.0";

/// Byte stream of a downloaded image.
pub type ImageStream = BoxStream<'static, Result<Bytes, FetchError>>;

/// Configuration for a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Logged-in session credential.
    pub session: Session,
    /// Requests admitted per `pool_interval`.
    pub pool_size: usize,
    /// How long an admitted request holds its slot.
    pub pool_interval: Duration,
    /// Base URL of the web API.
    pub base_url: String,
    /// Referer header value.
    pub referer: String,
    /// User agent string.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl FetcherConfig {
    /// Creates a configuration with default pool settings for a session credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential does not carry a user id.
    pub fn new(session: &str) -> Result<Self, FetchError> {
        Ok(Self::from_session(Session::parse(session)?))
    }

    /// Creates a configuration with default pool settings for a parsed session.
    #[must_use]
    pub fn from_session(session: Session) -> Self {
        Self {
            session,
            pool_size: DEFAULT_POOL_SIZE,
            pool_interval: DEFAULT_POOL_INTERVAL,
            base_url: BASE_URL.to_string(),
            referer: format!("{BASE_URL}/"),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the permit pool size and interval.
    #[must_use]
    pub const fn with_pool(mut self, size: usize, interval: Duration) -> Self {
        self.pool_size = size;
        self.pool_interval = interval;
        self
    }

    /// Sets the base URL of the web API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Rate-limited client for bookmark, work and page metadata.
///
/// Every API request is admitted through one shared [`PermitPool`]. Cloning
/// shares the pool, the connection pool and the [`FetchStats`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: Arc<FetcherConfig>,
    pool: PermitPool,
    stats: Arc<FetchStats>,
}

impl Fetcher {
    /// Creates a new fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let mut cookie =
            HeaderValue::from_str(&format!("PHPSESSID={};", config.session.expose()))
                .map_err(|_| SessionError::InvalidCharacter)?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);
        if let Ok(referer) = HeaderValue::from_str(&config.referer) {
            headers.insert(REFERER, referer);
        }

        let client = Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(config.pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        let pool = PermitPool::new(config.pool_size, config.pool_interval);
        debug!(
            user_id = config.session.user_id(),
            pool_size = pool.capacity(),
            pool_interval_ms = pool.interval().as_millis(),
            "fetcher configured"
        );

        Ok(Self {
            client,
            config: Arc::new(config),
            pool,
            stats: Arc::new(FetchStats::default()),
        })
    }

    /// Returns the fetcher configuration.
    #[must_use]
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Returns the id of the logged-in user.
    #[must_use]
    pub fn user_id(&self) -> u64 {
        self.config.session.user_id()
    }

    /// Returns the shared permit pool.
    #[must_use]
    pub const fn pool(&self) -> &PermitPool {
        &self.pool
    }

    /// Returns the current request and failure counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Gets the number of works the user has bookmarked publicly.
    ///
    /// Deleted or restricted works are included, so fewer works may be
    /// retrievable. Returns `0` if the request fails.
    #[instrument(skip(self), fields(user_id = self.user_id()))]
    pub async fn bookmark_count(&self) -> u32 {
        let first = Batch {
            offset: 0,
            limit: 1,
        };
        let url = bookmarks_url(&self.config.base_url, self.user_id(), first);
        self.fetch_json::<BookmarksBody>(&url, None)
            .await
            .map_or(0, |body| body.total)
    }

    /// Gets full detail of a single work.
    ///
    /// Returns `None` if the request fails, typically because the work is
    /// deleted or not accessible.
    #[instrument(skip(self))]
    pub async fn work(&self, work_id: u64) -> Option<Work> {
        let url = work_url(&self.config.base_url, work_id);
        self.fetch_json::<WorkBody>(&url, None)
            .await
            .ok()
            .map(map::detailed_work)
    }

    /// Gets the image of one page of a work, with its file name.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::PageOutOfRange`] if the work has no such page
    /// (including when its page list could not be fetched), or an HTTP error
    /// if the image request fails.
    #[instrument(skip(self))]
    pub async fn work_image(
        &self,
        work_id: u64,
        page: usize,
    ) -> Result<(ImageStream, String), FetchError> {
        let pages = self.pages(work_id).await;
        let available = pages.len();
        let page = pages.into_iter().nth(page).ok_or(FetchError::PageOutOfRange {
            work_id,
            page,
            available,
        })?;

        let stream = self.page_image(&page).await?;
        Ok((stream, page.file_name().to_string()))
    }

    /// Gets the original image of a page as a byte stream.
    ///
    /// Image requests go to the image host and are not admitted through the
    /// permit pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with an
    /// error status.
    pub async fn page_image(&self, page: &Page) -> Result<ImageStream, FetchError> {
        let response = self.client.get(&page.original_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes_stream().map_err(FetchError::from).boxed())
    }

    /// Admits, performs and decodes one API request.
    ///
    /// Failures are logged and counted here; callers decide whether to
    /// propagate or swallow them.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        scoped: Option<&ScopedLimit>,
    ) -> Result<T, FetchError> {
        self.pool.acquire(scoped).await;
        self.stats.record_admission();

        match self.get_document(url).await {
            Ok(body) => {
                self.stats.record_success();
                debug!(url, "request completed");
                Ok(body)
            }
            Err(e) => {
                self.stats.record_failure(&e);
                warn!(url, error = %e, "request failed");
                Err(e)
            }
        }
    }

    async fn get_document<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let raw = response.bytes().await?;
        let envelope: Envelope = serde_json::from_slice(&raw)?;
        envelope.into_body()
    }
}
