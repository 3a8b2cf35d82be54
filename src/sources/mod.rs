//! Listing strategies adapters build their `search` on.
//!
//! Sites come in two shapes. Some return a whole listing in one response,
//! others split it into numbered pages. An adapter embeds the matching
//! strategy and hands it a fetch function; the strategy turns the caller's
//! item offset into whatever the site understands.
//!
//! - [`SinglePageList`] - the listing is one page, later offsets are empty
//! - [`PagedList`] - numbered pages, with separate page sizes for plain
//!   listings and title searches
//!
//! # Examples
//!
//! ```rust
//! use shiori::prelude::*;
//! use shiori::error::Result;
//! use shiori::sources::PagedList;
//!
//! struct ExampleSite {
//!     paging: PagedList,
//! }
//!
//! impl ExampleSite {
//!     fn new() -> Self {
//!         Self { paging: PagedList::new(24, 20) }
//!     }
//!
//!     async fn fetch_page(&self, query: SearchQuery, page: u32) -> Result<Vec<Manga>> {
//!         // Request `?page={page}` from the site and parse the cards
//!         Ok(Vec::new())
//!     }
//!
//!     async fn list(&self, query: SearchQuery) -> Result<Vec<Manga>> {
//!         self.paging
//!             .search(query, |query, page| self.fetch_page(query, page))
//!             .await
//!     }
//! }
//! ```

pub mod paged;
pub mod single_page;

pub use paged::PagedList;
pub use single_page::SinglePageList;
