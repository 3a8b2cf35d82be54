//! Listings split into numbered remote pages.

use std::future::Future;

use crate::{error::Result, paginator::Paginator, search::SearchQuery, types::Manga};

/// Strategy for paged sites.
///
/// Plain listings and title searches often page differently on the same site,
/// so each gets its own [`Paginator`]. A query with a title match uses the
/// search paginator, every other query the listing one.
#[derive(Debug)]
pub struct PagedList {
    listing: Paginator,
    search: Paginator,
}

impl PagedList {
    pub fn new(page_size: usize, search_page_size: usize) -> Self {
        Self {
            listing: Paginator::new(page_size),
            search: Paginator::new(search_page_size),
        }
    }

    /// Same nominal size for both listing kinds.
    pub fn uniform(page_size: usize) -> Self {
        Self::new(page_size, page_size)
    }

    /// Sets the index of the first remote page for both paginators.
    pub fn with_first_page(self, first_page: u32, first_search_page: u32) -> Self {
        self.listing.set_first_page(first_page);
        self.search.set_first_page(first_search_page);
        self
    }

    pub fn listing_paginator(&self) -> &Paginator {
        &self.listing
    }

    pub fn search_paginator(&self) -> &Paginator {
        &self.search
    }

    /// Paginator responsible for `query`.
    pub fn paginator_for(&self, query: &SearchQuery) -> &Paginator {
        if query.has_title_match() {
            &self.search
        } else {
            &self.listing
        }
    }

    /// Fetches the page holding `query.offset` and learns from its size.
    ///
    /// `fetch` receives the query and the remote page number. A failed fetch
    /// leaves the paginator untouched.
    pub async fn search<F, Fut>(&self, query: SearchQuery, fetch: F) -> Result<Vec<Manga>>
    where
        F: FnOnce(SearchQuery, u32) -> Fut,
        Fut: Future<Output = Result<Vec<Manga>>>,
    {
        let paginator = self.paginator_for(&query);
        let offset = query.offset;
        let page = paginator.get_page(offset);

        let list = fetch(query, page).await?;
        paginator.on_list_received(offset, page, list.len());
        Ok(list)
    }
}
