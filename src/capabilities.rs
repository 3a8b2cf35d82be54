//! Declared search capabilities and query validation.
//!
//! Every adapter declares once which parts of [`SearchQuery`] its search can
//! honour. Queries are checked against that declaration before the adapter is
//! called, so an unsupported clause fails loudly with
//! [`Error::UnsupportedQuery`](crate::Error::UnsupportedQuery) instead of being
//! dropped somewhere inside adapter code.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    search::{QueryCriteria, SearchQuery},
};

/// Feature flags describing what a source's search supports.
///
/// ```rust
/// use shiori::capabilities::SearchCapabilities;
/// use shiori::search::SearchQuery;
///
/// let caps = SearchCapabilities {
///     search: true,
///     ..Default::default()
/// };
/// assert!(caps.validate(&SearchQuery::title("berserk")).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCapabilities {
    /// More than one included tag per query
    pub multiple_tags: bool,
    /// Excluded tags
    pub tags_exclusion: bool,
    /// Free-text title search
    pub search: bool,
    /// Free-text search combined with any other clause
    pub search_with_filters: bool,
    pub year: bool,
    pub year_range: bool,
    pub original_locale: bool,
    pub author_search: bool,
    pub state_filter: bool,
}

impl SearchCapabilities {
    /// Capabilities with every flag set.
    pub const fn all() -> Self {
        Self {
            multiple_tags: true,
            tags_exclusion: true,
            search: true,
            search_with_filters: true,
            year: true,
            year_range: true,
            original_locale: true,
            author_search: true,
            state_filter: true,
        }
    }

    /// Checks `query` against these capabilities.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedQuery`] naming the first feature the query needs
    /// but the source does not declare.
    pub fn validate(&self, query: &SearchQuery) -> Result<()> {
        let mut included_tags = 0usize;
        let mut has_text = false;

        for criterion in &query.criteria {
            match criterion {
                QueryCriteria::Match { .. } => {
                    require(self.search, "text search")?;
                    has_text = true;
                }
                QueryCriteria::TagInclude(_) => {
                    included_tags += 1;
                    if included_tags > 1 {
                        require(self.multiple_tags, "multiple tags")?;
                    }
                }
                QueryCriteria::TagExclude(_) => require(self.tags_exclusion, "tags exclusion")?,
                QueryCriteria::StateIs(_) => require(self.state_filter, "state filter")?,
                QueryCriteria::AuthorIs(_) => require(self.author_search, "author search")?,
                QueryCriteria::YearIs(_) => require(self.year, "year filter")?,
                QueryCriteria::YearRange { .. } => require(self.year_range, "year range filter")?,
                QueryCriteria::OriginalLocaleIs(_) => {
                    require(self.original_locale, "original locale filter")?
                }
                QueryCriteria::ContentRatingIs(_) => {}
            }
        }

        let has_filters = query.criteria.iter().any(|c| !c.is_title_match());
        if has_text && has_filters {
            require(self.search_with_filters, "search with filters")?;
        }
        Ok(())
    }
}

fn require(supported: bool, feature: &str) -> Result<()> {
    if supported {
        Ok(())
    } else {
        Err(Error::unsupported_query(feature))
    }
}
