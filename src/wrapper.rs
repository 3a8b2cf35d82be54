//! Caller-facing decorator around a raw adapter.
//!
//! [`ParserWrapper`] is what applications hold instead of the adapter
//! itself. It rejects queries the adapter cannot answer before any request is
//! made, fills in the default sort order, and runs every adapter call on a
//! [`WorkerPool`] so the caller's task only waits for the result.
//!
//! The wrapper is also an [`Interceptor`]: installing it on the adapter's
//! [`HttpClient`](crate::net::HttpClient) merges the adapter's default
//! headers into each request and then hands the request to
//! [`Source::intercept`].

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::Arc;

use crate::{
    capabilities::SearchCapabilities,
    config::AnyConfigKey,
    error::Result,
    net::{Chain, Interceptor, Request, Response, merge_headers},
    runtime::WorkerPool,
    search::SearchQuery,
    source::{AuthProvider, Source},
    types::{Chapter, Favicons, Manga, Page, SortOrder, SourceInfo},
};

pub struct ParserWrapper {
    delegate: Arc<dyn Source>,
    pool: WorkerPool,
}

impl std::fmt::Debug for ParserWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserWrapper")
            .field("source", &self.delegate.id())
            .field("pool", &self.pool)
            .finish()
    }
}

impl ParserWrapper {
    pub fn new(delegate: Arc<dyn Source>, pool: WorkerPool) -> Self {
        Self { delegate, pool }
    }

    /// The wrapped adapter.
    pub fn delegate(&self) -> &Arc<dyn Source> {
        &self.delegate
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Every configuration key the adapter recognizes.
    pub fn config_keys(&self) -> Vec<AnyConfigKey> {
        let mut keys = Vec::new();
        self.delegate.on_create_config(&mut keys);
        keys
    }
}

#[async_trait]
impl Source for ParserWrapper {
    fn info(&self) -> &SourceInfo {
        self.delegate.info()
    }

    fn capabilities(&self) -> SearchCapabilities {
        self.delegate.capabilities()
    }

    fn available_sort_orders(&self) -> &[SortOrder] {
        self.delegate.available_sort_orders()
    }

    fn default_sort_order(&self) -> SortOrder {
        self.delegate.default_sort_order()
    }

    /// Validates `query` against the adapter's capabilities, then searches.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedQuery`](crate::Error::UnsupportedQuery) if the
    /// adapter cannot honor a clause, unless `skip_validation` is set. The
    /// adapter is not called in that case.
    async fn search(&self, mut query: SearchQuery) -> Result<Vec<Manga>> {
        let delegate = Arc::clone(&self.delegate);
        self.pool
            .spawn(async move {
                if !query.skip_validation {
                    if let Err(e) = delegate.capabilities().validate(&query) {
                        tracing::debug!(source = delegate.id(), error = %e, "query rejected");
                        return Err(e);
                    }
                }
                if query.order.is_none() {
                    query.order = Some(delegate.default_sort_order());
                }
                delegate.search(query).await
            })
            .await?
    }

    async fn details(&self, manga: &Manga) -> Result<Manga> {
        let delegate = Arc::clone(&self.delegate);
        let manga = manga.clone();
        self.pool
            .spawn(async move { delegate.details(&manga).await })
            .await?
    }

    async fn pages(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        let delegate = Arc::clone(&self.delegate);
        let chapter = chapter.clone();
        self.pool
            .spawn(async move { delegate.pages(&chapter).await })
            .await?
    }

    async fn page_url(&self, page: &Page) -> Result<String> {
        let delegate = Arc::clone(&self.delegate);
        let page = page.clone();
        self.pool
            .spawn(async move { delegate.page_url(&page).await })
            .await?
    }

    async fn favicons(&self) -> Result<Favicons> {
        let delegate = Arc::clone(&self.delegate);
        self.pool
            .spawn(async move { delegate.favicons().await })
            .await?
    }

    async fn related(&self, seed: &Manga) -> Result<Vec<Manga>> {
        let delegate = Arc::clone(&self.delegate);
        let seed = seed.clone();
        self.pool
            .spawn(async move { delegate.related(&seed).await })
            .await?
    }

    fn request_headers(&self) -> HeaderMap {
        self.delegate.request_headers()
    }

    /// Adds the adapter's default headers, then lets the adapter intercept.
    ///
    /// Headers already on the request win over the defaults.
    async fn intercept(&self, mut request: Request, chain: &dyn Chain) -> Result<Response> {
        merge_headers(&mut request.headers, &self.delegate.request_headers(), false);
        self.delegate.intercept(request, chain).await
    }

    fn on_create_config(&self, keys: &mut Vec<AnyConfigKey>) {
        self.delegate.on_create_config(keys);
    }

    fn auth_provider(&self) -> Option<&dyn AuthProvider> {
        self.delegate.auth_provider()
    }
}

#[async_trait]
impl Interceptor for ParserWrapper {
    async fn intercept(&self, request: Request, chain: &dyn Chain) -> Result<Response> {
        Source::intercept(self, request, chain).await
    }
}
