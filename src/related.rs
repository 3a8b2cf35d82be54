//! Keyword based discovery of titles related to a seed manga.
//!
//! Each word of the seed's titles is searched on its own, ordered by
//! relevance. The narrowest non-empty result set wins: a word that matches
//! few titles says more about the seed than one that matches many.
//!
//! ```rust
//! use shiori::related::keywords;
//! use shiori::types::Manga;
//!
//! let mut seed = Manga::new("site", "1", "Blue Lock");
//! seed.alt_titles.push("Blue  Prison".to_string());
//! assert_eq!(keywords(&seed), vec!["Blue", "Lock", "Prison"]);
//! ```

use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::Result,
    search::SearchQuery,
    source::Source,
    types::{Manga, SortOrder},
};

pub struct RelatedMangaFinder {
    parsers: Vec<Arc<dyn Source>>,
}

impl RelatedMangaFinder {
    pub fn new(parsers: Vec<Arc<dyn Source>>) -> Self {
        Self { parsers }
    }

    /// Related titles from every source, concatenated in source order.
    ///
    /// # Errors
    ///
    /// Any failing search fails the whole call.
    pub async fn find(&self, seed: &Manga) -> Result<Vec<Manga>> {
        match self.parsers.as_slice() {
            [parser] => Self::find_in(parser.as_ref(), seed).await,
            parsers => {
                let lists = try_join_all(
                    parsers
                        .iter()
                        .map(|parser| Self::find_in(parser.as_ref(), seed)),
                )
                .await?;
                Ok(lists.into_iter().flatten().collect())
            }
        }
    }

    /// Related titles from a single source.
    ///
    /// Runs one title search per keyword concurrently. Results are stripped
    /// of the seed itself and of titles that do not contain the keyword. A
    /// seed without any keyword yields an empty list without searching.
    pub async fn find_in<P>(parser: &P, seed: &Manga) -> Result<Vec<Manga>>
    where
        P: Source + ?Sized,
    {
        let words = keywords(seed);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(source = parser.id(), keywords = words.len(), "searching related titles");
        let results = try_join_all(words.iter().map(|keyword| async move {
            let query = SearchQuery::title(keyword.as_str()).with_order(SortOrder::Relevance);
            let list = parser.search(query).await?;
            Ok::<_, crate::Error>(
                list.into_iter()
                    .filter(|manga| !manga.is_same(seed) && contains_keyword(manga, keyword))
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        Ok(smallest_non_empty(results))
    }
}

/// Distinct whitespace-separated words of the title and alternative titles,
/// in order of first appearance.
pub fn keywords(seed: &Manga) -> Vec<String> {
    let mut seen = HashSet::new();
    seed.all_titles()
        .flat_map(str::split_whitespace)
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}

fn contains_keyword(manga: &Manga, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    manga
        .all_titles()
        .any(|title| title.to_lowercase().contains(&keyword))
}

/// The shortest non-empty list, the first one on ties. Empty if every list is.
fn smallest_non_empty<T>(lists: Vec<Vec<T>>) -> Vec<T> {
    lists
        .into_iter()
        .filter(|list| !list.is_empty())
        .reduce(|best, list| if list.len() < best.len() { list } else { best })
        .unwrap_or_default()
}
