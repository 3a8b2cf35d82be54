//! Transport boundary: requests, interceptors and the HTTP client.
//!
//! Adapters fetch raw data through a [`Transport`]. The bundled
//! [`HttpClient`] implements it on top of a global reqwest client with
//! per-source rate limiting and retries, and can route every request through
//! an [`Interceptor`] (typically a
//! [`ParserWrapper`](crate::wrapper::ParserWrapper)) before it hits the
//! network.
//!
//! # Examples
//!
//! ```rust
//! use shiori::net::HttpClient;
//!
//! # async fn example() -> shiori::Result<()> {
//! let client = HttpClient::new("my_source")
//!     .with_rate_limit(500)  // 500ms between requests
//!     .with_max_retries(3);
//!
//! let html = client.get_text("https://example.com").await?;
//! let json: serde_json::Value = client.get_json("https://api.example.com").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::{
    Client, Method, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::{
    error::{Error, Result},
    settings::Settings,
};

pub mod html;

/// Global HTTP client instance.
///
/// Connection pooling (10 idle connections per host) and compression support
/// (gzip, brotli). Timeouts and the User-Agent are applied per request.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .unwrap_or_default()
});

/// An outgoing request as seen by interceptors.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::parse(format!("Invalid URL {}: {}", url, e)))?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    pub fn post(url: &str, body: impl Into<Bytes>) -> Result<Self> {
        let mut request = Self::new(Method::POST, url)?;
        request.body = Some(body.into());
        Ok(request)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        merge_headers(&mut self.headers, &headers, true);
        self
    }

    /// Adds a header, ignoring names or values that are not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (name.parse::<HeaderName>(), value.parse::<HeaderValue>()) {
            self.headers.insert(name, value);
        }
        self
    }
}

/// A received response.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    /// The body as a UTF-8 string.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| Error::parse_at(format!("Invalid UTF-8: {}", e), self.url.as_str()))
    }

    /// The body deserialized as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }
}

/// The remainder of the request pipeline behind an interceptor.
#[async_trait]
pub trait Chain: Send + Sync {
    async fn proceed(&self, request: Request) -> Result<Response>;
}

/// Request rewriting hook placed in front of the network.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, request: Request, chain: &dyn Chain) -> Result<Response>;
}

/// What adapters use to fetch raw data.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response>;
    async fn post(&self, url: &str, body: Bytes, headers: HeaderMap) -> Result<Response>;
}

/// Merges `other` into `target`.
///
/// Header names are compared as a whole: with `replace_existing == false` a
/// name already present in `target` keeps all its values and every value of
/// `other` for that name is ignored.
///
/// ```rust
/// use reqwest::header::HeaderMap;
/// use shiori::net::merge_headers;
///
/// let mut request = HeaderMap::new();
/// request.insert("a", "2".parse().unwrap());
/// let mut defaults = HeaderMap::new();
/// defaults.insert("a", "1".parse().unwrap());
/// defaults.insert("b", "3".parse().unwrap());
///
/// merge_headers(&mut request, &defaults, false);
/// assert_eq!(request["a"], "2");
/// assert_eq!(request["b"], "3");
/// ```
pub fn merge_headers(target: &mut HeaderMap, other: &HeaderMap, replace_existing: bool) {
    for name in other.keys() {
        if target.contains_key(name) {
            if !replace_existing {
                continue;
            }
            target.remove(name);
        }
        for value in other.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Per-source rate limiter to prevent overwhelming manga websites.
///
/// The rate limiter tracks the last request time for each source and enforces
/// a minimum delay between requests.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<HashMap<String, Instant>>,
    default_delay: Duration,
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: self.default_delay,
        }
    }
}

impl RateLimiter {
    /// Creates a new rate limiter with the specified default delay.
    ///
    /// ```rust
    /// use shiori::net::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(500);
    /// ```
    pub fn new(delay_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: Duration::from_millis(delay_ms),
        }
    }

    /// Waits if necessary before allowing a request for the specified source.
    pub async fn wait(&self, source_id: &str) {
        self.wait_custom(source_id, self.default_delay).await
    }

    /// Waits with a custom delay for a specific source.
    pub async fn wait_custom(&self, source_id: &str, delay: Duration) {
        let now = Instant::now();
        let wait_duration = {
            let last_map = self.last_request.lock();
            last_map
                .get(source_id)
                .map(|&last| now.duration_since(last))
                .filter(|&elapsed| elapsed < delay)
                .map(|elapsed| delay - elapsed)
        };

        if let Some(duration) = wait_duration {
            tokio::time::sleep(duration).await;
        }

        self.last_request
            .lock()
            .insert(source_id.to_string(), Instant::now());
    }
}

/// HTTP client wrapper with built-in rate limiting, retry logic and an
/// optional interceptor.
///
/// Each client is associated with a specific source and applies rate limiting
/// per-source. Headers set on the client are defaults: headers on the request
/// itself take precedence.
///
/// # Examples
///
/// ```rust
/// use shiori::net::HttpClient;
///
/// # async fn example() -> shiori::Result<()> {
/// let client = HttpClient::new("mangadex")
///     .with_rate_limit(1000)  // 1 second between requests
///     .with_max_retries(5);   // Retry up to 5 times
///
/// let html = client.get_text("https://mangadex.org/title/123").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    source_id: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
    timeout: Duration,
    headers: HeaderMap,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("source_id", &self.source_id)
            .field("rate_limiter", &self.rate_limiter)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .field("intercepted", &self.interceptor.is_some())
            .finish()
    }
}

impl HttpClient {
    /// Creates a new HTTP client for the specified source.
    ///
    /// Defaults: 200ms rate limit delay, 3 retries, 30 second timeout.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            rate_limiter: RateLimiter::new(200),
            max_retries: 3,
            timeout: Duration::from_secs(30),
            headers: HeaderMap::new(),
            interceptor: None,
        }
    }

    /// Creates a client configured from the process [`Settings`].
    pub fn from_settings(source_id: impl Into<String>, settings: &Settings) -> Self {
        Self::new(source_id)
            .with_rate_limit(settings.request_delay_ms)
            .with_max_retries(settings.max_retries)
            .with_timeout(Duration::from_secs(settings.timeout_secs))
            .with_header(USER_AGENT.as_str(), &settings.user_agent)
    }

    pub fn with_rate_limit(mut self, delay_ms: u64) -> Self {
        self.rate_limiter = RateLimiter::new(delay_ms);
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header to all requests made by this client.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (name.parse::<HeaderName>(), value.parse::<HeaderValue>()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Routes every request through `interceptor` before it is sent.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Executes a request through the interceptor (if any) and the network.
    ///
    /// # Errors
    ///
    /// * [`Error::RateLimit`] - If rate limited after retries
    /// * [`Error::Source`] - For HTTP errors (4xx, 5xx)
    /// * [`Error::Network`] - For network/connection errors
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let network = NetworkChain { client: self };
        let response = match &self.interceptor {
            Some(interceptor) => interceptor.intercept(request, &network).await?,
            None => network.proceed(request).await?,
        };

        if !response.status.is_success() {
            return Err(Error::source(
                &self.source_id,
                format!("HTTP {} at {}", response.status, response.url),
            ));
        }
        Ok(response)
    }

    /// Performs a GET request and returns the response as a UTF-8 string.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.execute(Request::get(url)?).await?.text()
    }

    /// Performs a GET request and deserializes the response as JSON.
    pub async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute(Request::get(url)?).await?.json()
    }

    /// Sends a request to the network, applying rate limiting and retrying
    /// 429 responses and connection errors with exponential backoff.
    async fn send(&self, request: Request) -> Result<Response> {
        let mut headers = request.headers;
        merge_headers(&mut headers, &self.headers, false);
        let mut attempts = 0;

        loop {
            self.rate_limiter.wait(&self.source_id).await;

            let mut builder = CLIENT
                .request(request.method.clone(), request.url.clone())
                .headers(headers.clone())
                .timeout(self.timeout);
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            match builder.send().await {
                Ok(response) => {
                    if response.status() == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.max_retries {
                            attempts += 1;
                            let delay = backoff(attempts);
                            tracing::warn!(
                                source = %self.source_id,
                                attempt = attempts,
                                ?delay,
                                "rate limited, backing off"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }

                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok());

                        return Err(Error::rate_limit(retry_after));
                    }

                    let url = response.url().clone();
                    let status = response.status();
                    let headers = response.headers().clone();
                    let body = response.bytes().await?;
                    return Ok(Response {
                        url,
                        status,
                        headers,
                        body,
                    });
                }
                Err(e) => {
                    if attempts < self.max_retries {
                        attempts += 1;
                        tracing::warn!(
                            source = %self.source_id,
                            attempt = attempts,
                            error = %e,
                            "request failed, retrying"
                        );
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

/// Longest wait between two retries of a rate-limited request.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Exponential backoff for the given retry attempt, capped at [`MAX_BACKOFF`].
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(2_u64.saturating_pow(attempt)).min(MAX_BACKOFF)
}

/// Terminal chain link that performs the actual network call.
struct NetworkChain<'a> {
    client: &'a HttpClient,
}

#[async_trait]
impl Chain for NetworkChain<'_> {
    async fn proceed(&self, request: Request) -> Result<Response> {
        self.client.send(request).await
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        self.execute(Request::get(url)?.with_headers(headers)).await
    }

    async fn post(&self, url: &str, body: Bytes, headers: HeaderMap) -> Result<Response> {
        self.execute(Request::post(url, body)?.with_headers(headers))
            .await
    }
}
