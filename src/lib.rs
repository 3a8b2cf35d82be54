//! # Shiori - Manga source adapter framework
//!
//! Shiori is the common layer every manga site adapter is written against. It
//! defines what an adapter is ([`Source`]), which queries it can answer
//! ([`SearchCapabilities`]), how its listings are paged ([`Paginator`]), how
//! it is configured ([`config`]) and how its HTTP traffic is shaped
//! ([`net`]). Callers never talk to an adapter directly but through a
//! [`ParserWrapper`], which validates queries and dispatches the work onto a
//! [`WorkerPool`].
//!
//! ## Features
//!
//! - **Typed Queries**: Search clauses are values, checked against what each source supports
//! - **Learned Pagination**: Offsets are mapped onto remote pages whose size is discovered on the fly
//! - **Per-source Configuration**: Domain mirrors, user agent and content switches as typed keys
//! - **Request Interception**: Sources rewrite their own requests, default headers never clobber explicit ones
//! - **Worker Pool**: Adapter calls run on a bounded tokio runtime and are cancelled with the caller
//! - **Related Titles**: Keyword based discovery across one or many sources
//!
//! ## Quick Start
//!
//! ```rust
//! use shiori::prelude::*;
//! use shiori::error::Result;
//! use shiori::Settings;
//!
//! # async fn example(adapter: impl Source + 'static) -> Result<()> {
//! // Dedicated `shiori-worker` pool sized from `SHIORI_*` settings
//! let mut sources = Sources::from_settings(&Settings::from_env()?)?;
//! sources.add(adapter);
//!
//! let source = sources.get("mangadex").ok_or_else(|| Error::not_found("mangadex"))?;
//! let query = SearchQueryBuilder::default()
//!     .criterion(QueryCriteria::title("frieren"))
//!     .order(SortOrder::Popularity)
//!     .build()
//!     .map_err(|e| Error::Other(e.to_string()))?;
//!
//! for manga in source.search(query).await? {
//!     println!("{} ({})", manga.title, manga.public_url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`types`]: Records returned by sources and their enumerations
//! - [`search`]: Queries and their clauses
//! - [`capabilities`]: Per-source query support and validation
//! - [`paginator`]: Offset to page mapping with page size learning
//! - [`sources`]: Single-page and paged listing strategies
//! - [`source`]: The adapter contract, shared adapter state, and the source collection
//! - [`wrapper`]: Validation and dispatch around an adapter
//! - [`related`]: Related title discovery
//! - [`config`] / [`settings`]: Per-source keys and process-wide settings
//! - [`net`]: Requests, interceptors, and the HTTP client
//! - [`error`]: Error handling

pub mod capabilities;
pub mod config;
pub mod error;
pub mod favicon;
pub mod net;
pub mod paginator;
pub mod related;
pub mod runtime;
pub mod search;
pub mod settings;
pub mod source;
pub mod sources;
pub mod types;
pub mod wrapper;

/// Prelude module for convenient imports.
///
/// ```rust
/// use shiori::prelude::*;
///
/// // Now you have access to:
/// // - Source, Sources, ParserWrapper, WorkerPool
/// // - SearchQuery, SearchQueryBuilder, QueryCriteria, SearchCapabilities
/// // - Manga, Chapter, Page, SortOrder
/// ```
pub mod prelude {
    pub use crate::{
        capabilities::SearchCapabilities,
        error::{Error, Result},
        runtime::WorkerPool,
        search::{QueryCriteria, SearchQuery, SearchQueryBuilder, SearchableField},
        source::{ParserBase, ParserContext, Source, Sources},
        types::{Chapter, Manga, MangaTag, Page, SortOrder, SourceInfo},
        wrapper::ParserWrapper,
    };
}

// Re-export main types at crate root for direct access
pub use capabilities::SearchCapabilities;
pub use error::{Error, Result};
pub use paginator::Paginator;
pub use runtime::WorkerPool;
pub use search::{QueryCriteria, SearchQuery};
pub use settings::Settings;
pub use source::{Source, Sources};
pub use types::{Chapter, Manga, Page, SortOrder};
pub use wrapper::ParserWrapper;
