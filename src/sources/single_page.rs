//! Listings that fit in a single response.

use std::future::Future;

use crate::{error::Result, search::SearchQuery, types::Manga};

/// Strategy for sites without pagination.
///
/// The fetch function is only called for offset 0. Any later offset is past
/// the end of the listing and yields an empty list without calling it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglePageList;

impl SinglePageList {
    pub fn new() -> Self {
        Self
    }

    pub async fn search<F, Fut>(&self, query: SearchQuery, fetch: F) -> Result<Vec<Manga>>
    where
        F: FnOnce(SearchQuery) -> Fut,
        Fut: Future<Output = Result<Vec<Manga>>>,
    {
        if query.offset > 0 {
            return Ok(Vec::new());
        }
        fetch(query).await
    }
}
