//! Source trait, shared adapter state, and the source collection.
//!
//! This module defines the [`Source`] contract every site adapter implements,
//! the [`ParserContext`]/[`ParserBase`] helpers adapters embed for the parts
//! that are the same on every site (domain mirrors, user agent, favicons),
//! and the [`Sources`] collection that wraps each registered adapter in a
//! [`ParserWrapper`].
//!
//! # Examples
//!
//! ```rust
//! use shiori::prelude::*;
//! use shiori::error::Result;
//! use shiori::Settings;
//!
//! # async fn example(adapter: impl Source + 'static, seed: Manga) -> Result<()> {
//! // Dedicated `shiori-worker` pool sized from `SHIORI_*` settings
//! let mut sources = Sources::from_settings(&Settings::from_env()?)?;
//! sources.add(adapter);
//!
//! // Related titles across every registered source
//! let related = sources.related(&seed).await?;
//!
//! // A single wrapped source
//! if let Some(source) = sources.get("mangadex") {
//!     let page = source.search(SearchQuery::title("one piece")).await?;
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    capabilities::SearchCapabilities,
    config::{AnyConfigKey, ConfigKey, ConfigStore, SourceConfig},
    error::Result,
    favicon::FaviconParser,
    net::{Chain, Request, Response, Transport},
    related::RelatedMangaFinder,
    runtime::WorkerPool,
    search::SearchQuery,
    settings::Settings,
    types::{Chapter, Favicons, Manga, Page, SortOrder, SourceInfo},
    wrapper::ParserWrapper,
};

/// Trait that all manga sources must implement.
///
/// # Required Methods
///
/// * [`info()`](Source::info) - Static description of the source
/// * [`capabilities()`](Source::capabilities) - What the search supports
/// * [`available_sort_orders()`](Source::available_sort_orders) - Supported orders
/// * [`search()`](Source::search) - One page of a listing
/// * [`details()`](Source::details) - Full metadata and chapters of a manga
/// * [`pages()`](Source::pages) - Pages of a chapter
/// * [`favicons()`](Source::favicons) - Icons of the website
///
/// # Implementation Guidelines
///
/// - Paged sites embed a [`PagedList`](crate::sources::PagedList), sites
///   without pagination a [`SinglePageList`](crate::sources::SinglePageList)
/// - Common state (domain, user agent) lives in a [`ParserBase`]
/// - Ensure all returned records have the correct `source_id` set
/// - Callers should reach adapters through a [`ParserWrapper`], which
///   validates queries and moves the work onto the worker pool
#[async_trait]
pub trait Source: Send + Sync {
    fn info(&self) -> &SourceInfo;

    /// Returns the unique identifier for this source.
    fn id(&self) -> &'static str {
        self.info().id
    }

    fn capabilities(&self) -> SearchCapabilities;

    fn available_sort_orders(&self) -> &[SortOrder];

    /// Order used when a query does not pick one: the most preferred of
    /// [`available_sort_orders`](Source::available_sort_orders).
    fn default_sort_order(&self) -> SortOrder {
        SortOrder::preferred(self.available_sort_orders()).unwrap_or(SortOrder::Updated)
    }

    /// Fetches the part of a listing starting at `query.offset`.
    ///
    /// An offset past the end of the listing yields an empty list, not an
    /// error.
    async fn search(&self, query: SearchQuery) -> Result<Vec<Manga>>;

    /// Fetches full metadata, including chapters, for a listed manga.
    async fn details(&self, manga: &Manga) -> Result<Manga>;

    async fn pages(&self, chapter: &Chapter) -> Result<Vec<Page>>;

    /// Resolves the direct image URL of a page.
    async fn page_url(&self, page: &Page) -> Result<String> {
        Ok(page.url.clone())
    }

    async fn favicons(&self) -> Result<Favicons>;

    /// Finds titles related to `seed` by keyword search on this source.
    async fn related(&self, seed: &Manga) -> Result<Vec<Manga>> {
        RelatedMangaFinder::find_in(self, seed).await
    }

    /// Headers this source wants on every request.
    ///
    /// They are merged as defaults by [`ParserWrapper`]: a header set by the
    /// transport or by an earlier interceptor is never replaced. New code
    /// should prefer [`intercept`](Source::intercept).
    fn request_headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    /// Rewrites outgoing requests of this source.
    async fn intercept(&self, request: Request, chain: &dyn Chain) -> Result<Response> {
        chain.proceed(request).await
    }

    /// Registers the configuration keys this source recognizes.
    fn on_create_config(&self, _keys: &mut Vec<AnyConfigKey>) {}

    /// Login support, for sources that have it.
    fn auth_provider(&self) -> Option<&dyn AuthProvider> {
        None
    }
}

/// Login state of a source that supports user accounts.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Page where the user signs in.
    fn auth_url(&self) -> String;

    async fn is_authorized(&self) -> Result<bool>;

    /// # Errors
    ///
    /// [`Error::AuthRequired`](crate::Error::AuthRequired) when not signed in.
    async fn username(&self) -> Result<String>;
}

/// Collaborators shared by every adapter of an application.
#[derive(Clone)]
pub struct ParserContext {
    pub config_store: Arc<dyn ConfigStore>,
    pub transport: Arc<dyn Transport>,
    /// User-Agent used when a source has no configured one
    pub user_agent: String,
}

impl ParserContext {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        transport: Arc<dyn Transport>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            config_store,
            transport,
            user_agent: user_agent.into(),
        }
    }

    /// Configuration view for one source.
    pub fn config(&self, info: &SourceInfo) -> SourceConfig {
        SourceConfig::new(info.id, Arc::clone(&self.config_store))
    }
}

/// State common to most adapters: description, configuration, transport and
/// the domain/user-agent keys.
pub struct ParserBase {
    info: SourceInfo,
    config: SourceConfig,
    transport: Arc<dyn Transport>,
    domain_key: ConfigKey<String>,
    user_agent_key: ConfigKey<String>,
}

impl ParserBase {
    /// `mirrors` are the known domains of the site, the first is the default.
    pub fn new(context: &ParserContext, info: SourceInfo, mirrors: &[&str]) -> Self {
        let config = context.config(&info);
        Self {
            info,
            config,
            transport: Arc::clone(&context.transport),
            domain_key: ConfigKey::domain(mirrors),
            user_agent_key: ConfigKey::user_agent(context.user_agent.clone()),
        }
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Currently selected domain of the source.
    pub fn domain(&self) -> String {
        self.config.get(&self.domain_key)
    }

    pub fn user_agent(&self) -> String {
        self.config.get(&self.user_agent_key)
    }

    /// `User-Agent` from the configuration.
    pub fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.user_agent()) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => {
                tracing::warn!(
                    source = self.info.id,
                    "configured user agent is not a valid header"
                );
            }
        }
        headers
    }

    pub fn on_create_config(&self, keys: &mut Vec<AnyConfigKey>) {
        keys.push(self.domain_key.describe());
        keys.push(self.user_agent_key.describe());
    }

    /// Turns a site-relative link into an absolute URL on the current domain.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if let Some(rest) = path.strip_prefix("//") {
            format!("https://{}", rest)
        } else {
            format!("https://{}/{}", self.domain(), path.trim_start_matches('/'))
        }
    }

    /// Favicons advertised on the source's main page.
    pub async fn favicons(&self) -> Result<Favicons> {
        let domain = self.domain();
        FaviconParser::new(self.transport.as_ref(), &domain)
            .parse()
            .await
    }
}

/// A collection of wrapped manga sources.
///
/// Every source added is wrapped in a [`ParserWrapper`] sharing the
/// collection's [`WorkerPool`], so all calls through the collection are
/// validated and dispatched the same way.
pub struct Sources {
    pool: WorkerPool,
    sources: Vec<Arc<ParserWrapper>>,
    by_id: HashMap<String, usize>,
}

impl Sources {
    /// Creates an empty collection backed by a dedicated worker pool.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(WorkerPool::from_settings(settings)?))
    }

    /// Creates a new empty source collection on `pool`.
    pub fn new(pool: WorkerPool) -> Self {
        Self {
            pool,
            sources: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Adds a source to the collection.
    ///
    /// A source with an ID already present replaces the earlier one.
    pub fn add(&mut self, source: impl Source + 'static) -> &mut Self {
        self.add_shared(Arc::new(source))
    }

    pub fn add_shared(&mut self, source: Arc<dyn Source>) -> &mut Self {
        let id = source.id().to_string();
        let wrapper = Arc::new(ParserWrapper::new(source, self.pool.clone()));
        match self.by_id.get(&id) {
            Some(&index) => self.sources[index] = wrapper,
            None => {
                self.by_id.insert(id, self.sources.len());
                self.sources.push(wrapper);
            }
        }
        self
    }

    /// Retrieves a wrapped source by its ID.
    pub fn get(&self, id: &str) -> Option<Arc<ParserWrapper>> {
        self.by_id
            .get(id)
            .and_then(|&index| self.sources.get(index))
            .cloned()
    }

    /// Returns a list of all source IDs in the collection.
    pub fn list_ids(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Searches every source concurrently for titles related to `seed`.
    ///
    /// # Errors
    ///
    /// Fails as soon as any source fails; there are no partial results.
    pub async fn related(&self, seed: &Manga) -> Result<Vec<Manga>> {
        let parsers = self
            .sources
            .iter()
            .map(|source| Arc::clone(source) as Arc<dyn Source>)
            .collect();
        RelatedMangaFinder::new(parsers).find(seed).await
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
