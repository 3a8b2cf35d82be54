//! Common test utilities and constants
//!
//! An in-memory adapter that records every call, plus helpers shared by the
//! test modules.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use shiori::capabilities::SearchCapabilities;
use shiori::config::AnyConfigKey;
use shiori::error::{Error, Result};
use shiori::net::{Chain, Request, Response};
use shiori::search::SearchQuery;
use shiori::source::{AuthProvider, Source};
use shiori::sources::{PagedList, SinglePageList};
use shiori::types::{Chapter, ContentType, Favicons, Manga, Page, SortOrder, SourceInfo};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[allow(dead_code)]
pub const FAKE_INFO: SourceInfo = SourceInfo::new("fake", "Fake Source", "en", ContentType::Manga);

/// Manga record of the fake source.
#[allow(dead_code)]
pub fn manga(id: &str, title: &str) -> Manga {
    Manga::new(FAKE_INFO.id, id, title)
}

/// `count` records titled after `keyword`.
#[allow(dead_code)]
pub fn titled(keyword: &str, count: usize) -> Vec<Manga> {
    (0..count)
        .map(|i| manga(&format!("{}-{}", keyword, i), &format!("{} {}", keyword, i)))
        .collect()
}

/// Login state with a fixed answer.
#[allow(dead_code)]
pub struct FakeAuth {
    pub username: Option<String>,
}

#[async_trait]
impl AuthProvider for FakeAuth {
    fn auth_url(&self) -> String {
        "https://fake.test/login".to_string()
    }

    async fn is_authorized(&self) -> Result<bool> {
        Ok(self.username.is_some())
    }

    async fn username(&self) -> Result<String> {
        self.username
            .clone()
            .ok_or_else(|| Error::auth_required(FAKE_INFO.id))
    }
}

enum Listing {
    Single(SinglePageList),
    Paged {
        paging: PagedList,
        remote_page_size: usize,
    },
}

/// Adapter serving a fixed catalog, recording what it is asked.
#[allow(dead_code)]
pub struct FakeSource {
    info: SourceInfo,
    capabilities: SearchCapabilities,
    orders: Vec<SortOrder>,
    listing: Listing,
    catalog: Vec<Manga>,
    by_keyword: HashMap<String, Vec<Manga>>,
    failing_keyword: Option<String>,
    headers: HeaderMap,
    offline_status: Option<StatusCode>,
    delay: Option<Duration>,
    auth: Option<FakeAuth>,
    pub started: AtomicUsize,
    pub finished: AtomicUsize,
    pub search_threads: Mutex<Vec<Option<String>>>,
    pub intercepted: Mutex<Vec<HeaderMap>>,
    pub queries: Mutex<Vec<SearchQuery>>,
    pub pages_requested: Mutex<Vec<u32>>,
}

#[allow(dead_code)]
impl FakeSource {
    pub fn new() -> Self {
        Self::with_info(FAKE_INFO)
    }

    pub fn with_info(info: SourceInfo) -> Self {
        Self {
            info,
            capabilities: SearchCapabilities::all(),
            orders: vec![SortOrder::Updated, SortOrder::Popularity, SortOrder::Relevance],
            listing: Listing::Single(SinglePageList::new()),
            catalog: Vec::new(),
            by_keyword: HashMap::new(),
            failing_keyword: None,
            headers: HeaderMap::new(),
            offline_status: None,
            delay: None,
            auth: None,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            search_threads: Mutex::new(Vec::new()),
            intercepted: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            pages_requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capabilities(mut self, capabilities: SearchCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_orders(mut self, orders: Vec<SortOrder>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<Manga>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Pages the catalog by `remote_page_size` while the adapter only knows
    /// `nominal_page_size`.
    pub fn paged(mut self, nominal_page_size: usize, remote_page_size: usize) -> Self {
        self.listing = Listing::Paged {
            paging: PagedList::uniform(nominal_page_size),
            remote_page_size,
        };
        self
    }

    /// Title searches for `keyword` answer with `results`.
    pub fn answering(mut self, keyword: &str, results: Vec<Manga>) -> Self {
        self.by_keyword.insert(keyword.to_string(), results);
        self
    }

    pub fn failing_on(mut self, keyword: &str) -> Self {
        self.failing_keyword = Some(keyword.to_string());
        self
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
        self
    }

    /// Answers intercepted requests itself with `status` instead of
    /// proceeding to the network.
    pub fn offline(mut self, status: StatusCode) -> Self {
        self.offline_status = Some(status);
        self
    }

    /// Every search sleeps for `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn signed_in_as(mut self, username: Option<&str>) -> Self {
        self.auth = Some(FakeAuth {
            username: username.map(str::to_string),
        });
        self
    }

    pub fn searches_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn searches_finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn keywords_searched(&self) -> Vec<String> {
        self.queries
            .lock()
            .iter()
            .filter_map(|query| query.text_match().map(str::to_string))
            .collect()
    }

    async fn fetch_all(&self) -> Result<Vec<Manga>> {
        Ok(self.catalog.clone())
    }

    async fn fetch_page(&self, page: u32, remote_page_size: usize) -> Result<Vec<Manga>> {
        self.pages_requested.lock().push(page);
        let start = (page.saturating_sub(1) as usize) * remote_page_size;
        Ok(self
            .catalog
            .iter()
            .skip(start)
            .take(remote_page_size)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Source for FakeSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn capabilities(&self) -> SearchCapabilities {
        self.capabilities
    }

    fn available_sort_orders(&self) -> &[SortOrder] {
        &self.orders
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<Manga>> {
        self.queries.lock().push(query.clone());
        self.search_threads
            .lock()
            .push(std::thread::current().name().map(str::to_string));

        if let Some(delay) = self.delay {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
        }

        if let Some(text) = query.text_match() {
            if self.failing_keyword.as_deref() == Some(text) {
                return Err(Error::source(self.info.id, format!("search for {} failed", text)));
            }
            if let Some(results) = self.by_keyword.get(text) {
                return Ok(results.clone());
            }
        }

        match &self.listing {
            Listing::Single(single) => single.search(query, |_| self.fetch_all()).await,
            Listing::Paged {
                paging,
                remote_page_size,
            } => {
                let size = *remote_page_size;
                paging
                    .search(query, |_, page| self.fetch_page(page, size))
                    .await
            }
        }
    }

    async fn details(&self, manga: &Manga) -> Result<Manga> {
        let mut details = manga.clone();
        details.description = Some(format!("About {}", manga.title));
        details.chapters = Some(vec![Chapter {
            id: format!("{}/1", manga.id),
            title: Some("Chapter 1".to_string()),
            number: 1.0,
            volume: 0,
            url: format!("/manga/{}/1", manga.id),
            scanlator: None,
            branch: None,
            source_id: self.info.id.to_string(),
        }]);
        Ok(details)
    }

    async fn pages(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        if chapter.url.is_empty() {
            return Err(Error::not_found(format!("chapter {}", chapter.id)));
        }
        Ok((1..=3)
            .map(|n| Page {
                id: format!("{}/{}", chapter.id, n),
                url: format!("https://img.fake.test{}/{}.jpg", chapter.url, n),
                preview: None,
                source_id: self.info.id.to_string(),
            })
            .collect())
    }

    async fn favicons(&self) -> Result<Favicons> {
        Ok(Favicons::new(Vec::new(), "https://fake.test/"))
    }

    fn request_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    async fn intercept(&self, request: Request, chain: &dyn Chain) -> Result<Response> {
        self.intercepted.lock().push(request.headers.clone());
        match self.offline_status {
            Some(status) => Ok(Response {
                url: request.url,
                status,
                headers: HeaderMap::new(),
                body: bytes::Bytes::from_static(br#"{"title":"offline"}"#),
            }),
            None => chain.proceed(request).await,
        }
    }

    fn on_create_config(&self, keys: &mut Vec<AnyConfigKey>) {
        keys.push(shiori::config::ConfigKey::show_suspicious_content(false).describe());
    }

    fn auth_provider(&self) -> Option<&dyn AuthProvider> {
        self.auth.as_ref().map(|auth| auth as &dyn AuthProvider)
    }
}

/// Terminal chain that records the request and answers `200 OK`.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingChain {
    pub seen: Mutex<Vec<Request>>,
}

#[async_trait]
impl Chain for RecordingChain {
    async fn proceed(&self, request: Request) -> Result<Response> {
        let url = request.url.clone();
        self.seen.lock().push(request);
        Ok(Response {
            url,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: bytes::Bytes::from_static(b"ok"),
        })
    }
}
