//! Error types and result handling for Shiori operations.
//!
//! This module defines the error handling system shared by the runtime and by
//! every adapter plugged into it. All operations return a [`Result<T>`] which is
//! a type alias for `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Query Errors**: a search asks for something the adapter does not support
//! - **Network Errors**: connection issues, timeouts, HTTP errors
//! - **Parse Errors**: invalid HTML, JSON, or data format issues
//! - **Source Errors**: website-specific errors with context
//! - **Not Found**: missing manga, chapters, or sources
//! - **Rate Limiting**: when requests are throttled
//! - **Dispatch Errors**: a worker task was cancelled or panicked
//!
//! An empty result list is never an error: an offset past the end of a
//! listing, or a related-content seed without keywords, yields `Ok(vec![])`.
//!
//! # Examples
//!
//! ```rust
//! use shiori::error::{Error, Result};
//!
//! fn check(result: Result<Vec<shiori::Manga>>) {
//!     match result {
//!         Ok(list) => println!("Found {} results", list.len()),
//!         Err(Error::UnsupportedQuery { feature }) => println!("Not supported: {}", feature),
//!         Err(e) => println!("Other error: {}", e),
//!     }
//! }
//! ```

use thiserror::Error;

/// Type alias for Results with Shiori errors.
///
/// ```rust
/// use shiori::{Error, Result};
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::parse("Something went wrong"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all Shiori operations.
///
/// # Variants
///
/// * [`UnsupportedQuery`](Error::UnsupportedQuery) - Query exceeds declared capabilities
/// * [`Network`](Error::Network) - HTTP client and connection errors
/// * [`Parse`](Error::Parse) - Data parsing and format errors
/// * [`Source`](Error::Source) - Source-specific errors with context
/// * [`NotFound`](Error::NotFound) - Missing resources
/// * [`RateLimit`](Error::RateLimit) - Rate limiting responses
/// * [`AuthRequired`](Error::AuthRequired) - Content needs an authorized session
/// * [`Io`](Error::Io) - File system and IO errors
/// * [`Json`](Error::Json) - JSON serialization errors
/// * [`Join`](Error::Join) - Worker task failures
/// * [`Config`](Error::Config) - Settings could not be loaded
/// * [`Other`](Error::Other) - Generic error messages
#[derive(Error, Debug)]
pub enum Error {
    /// The search query uses a feature the adapter does not declare.
    ///
    /// Raised by capability validation before the adapter is invoked, so no
    /// network request is made for a rejected query. The `feature` field names
    /// the missing capability.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shiori::Error;
    ///
    /// let error = Error::unsupported_query("tags exclusion");
    /// assert!(error.is_unsupported_query());
    /// ```
    #[error("Unsupported query: {feature} is not supported by this source")]
    UnsupportedQuery { feature: String },

    /// Network-related errors from HTTP operations.
    ///
    /// This variant wraps errors from the underlying HTTP client (reqwest),
    /// including connection timeouts, DNS resolution failures, and HTTP
    /// transport errors.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTML/JSON parsing and data format errors.
    ///
    /// ```rust
    /// use shiori::Error;
    ///
    /// let error = Error::parse("Missing title field in response");
    /// ```
    #[error("Parse error: {0}")]
    Parse(String),

    /// Source-specific errors with contextual information.
    ///
    /// # Fields
    ///
    /// * `src` - The identifier of the source that encountered the error
    /// * `message` - Descriptive error message explaining what went wrong
    ///
    /// ```rust
    /// use shiori::Error;
    ///
    /// let error = Error::source("mangadex", "API rate limit exceeded");
    /// ```
    #[error("Source error [{src}]: {message}")]
    Source { src: String, message: String },

    /// Resource not found errors.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limiting errors from manga sources.
    ///
    /// Optionally carries the number of seconds to wait before retrying, as
    /// provided by the source's `Retry-After` header.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimit { retry_after: Option<u64> },

    /// The requested content is only available to an authorized session.
    #[error("Authorization required [{src}]")]
    AuthRequired { src: String },

    /// File system and IO operation errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization and deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Join errors.
    ///
    /// This variant wraps errors from worker-pool tasks that were cancelled or
    /// panicked.
    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Runtime settings could not be loaded or deserialized.
    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Generic error messages.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a parse error for content fetched from `url`.
    ///
    /// ```rust
    /// use shiori::Error;
    ///
    /// let error = Error::parse_at("Missing chapter list", "https://example.com/manga/1");
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Parse error: Missing chapter list at https://example.com/manga/1"
    /// );
    /// ```
    pub fn parse_at(msg: impl Into<String>, url: impl AsRef<str>) -> Self {
        Error::Parse(format!("{} at {}", msg.into(), url.as_ref()))
    }

    /// Creates a source-specific error with source ID and message.
    ///
    /// ```rust
    /// use shiori::Error;
    ///
    /// let error = Error::source("madara-site", "Invalid response format");
    /// ```
    pub fn source(src: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Source {
            src: src.into(),
            message: msg.into(),
        }
    }

    /// Creates a not found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a rate limit error with optional retry-after time.
    pub fn rate_limit(retry_after: Option<u64>) -> Self {
        Error::RateLimit { retry_after }
    }

    /// Creates an unsupported query error naming the missing feature.
    pub fn unsupported_query(feature: impl Into<String>) -> Self {
        Error::UnsupportedQuery {
            feature: feature.into(),
        }
    }

    /// Creates an authorization error for the given source.
    pub fn auth_required(src: impl Into<String>) -> Self {
        Error::AuthRequired { src: src.into() }
    }

    /// Returns `true` if this error was raised by query validation.
    pub fn is_unsupported_query(&self) -> bool {
        matches!(self, Error::UnsupportedQuery { .. })
    }
}
