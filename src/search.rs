//! Search queries and their criteria.
//!
//! A [`SearchQuery`] describes one request for a listing: where in the overall
//! result stream to start, how to sort, and a list of [`QueryCriteria`]
//! clauses. Queries are built once, validated against the adapter's
//! [`SearchCapabilities`](crate::capabilities::SearchCapabilities), and then
//! read by the adapter without modification.
//!
//! # Examples
//!
//! ```rust
//! use shiori::search::{QueryCriteria, SearchQueryBuilder};
//! use shiori::types::{MangaTag, SortOrder};
//!
//! let query = SearchQueryBuilder::default()
//!     .offset(40)
//!     .order(SortOrder::Popularity)
//!     .criterion(QueryCriteria::TagInclude(MangaTag::new("action", "Action")))
//!     .criterion(QueryCriteria::TagExclude(MangaTag::new("ecchi", "Ecchi")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(query.offset, 40);
//! assert_eq!(query.criteria.len(), 2);
//! assert!(!query.has_title_match());
//! ```

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::types::{ContentRating, MangaState, MangaTag, SortOrder};

/// Fields a free-text [`QueryCriteria::Match`] can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SearchableField {
    TitleName,
}

/// One clause of a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryCriteria {
    /// Free-text match against a field
    Match {
        field: SearchableField,
        value: String,
    },
    TagInclude(MangaTag),
    TagExclude(MangaTag),
    StateIs(MangaState),
    AuthorIs(String),
    ContentRatingIs(ContentRating),
    YearIs(u16),
    YearRange { from: u16, to: u16 },
    OriginalLocaleIs(String),
}

impl QueryCriteria {
    /// Shorthand for a title match.
    pub fn title(value: impl Into<String>) -> Self {
        QueryCriteria::Match {
            field: SearchableField::TitleName,
            value: value.into(),
        }
    }

    pub fn is_title_match(&self) -> bool {
        matches!(
            self,
            QueryCriteria::Match {
                field: SearchableField::TitleName,
                ..
            }
        )
    }
}

/// Parameters of a single listing request.
///
/// # Fields
///
/// * `offset` - Logical position in the overall result stream, not a page number
/// * `order` - Requested sort order, `None` lets the adapter pick its default
/// * `criteria` - Ordered list of clauses
/// * `skip_validation` - Bypass capability validation for pre-validated or probing callers
///
/// # Builder Usage
///
/// ```rust
/// use shiori::search::SearchQueryBuilder;
///
/// let query = SearchQueryBuilder::default()
///     .skip_validation(true)
///     .build()
///     .unwrap();
/// assert!(query.skip_validation);
/// assert!(query.order.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct SearchQuery {
    #[builder(default)]
    pub offset: usize,
    #[builder(default, setter(strip_option))]
    pub order: Option<SortOrder>,
    #[builder(default, setter(each(name = "criterion")))]
    pub criteria: Vec<QueryCriteria>,
    #[builder(default)]
    pub skip_validation: bool,
}

impl SearchQuery {
    /// Creates a query matching `text` against titles.
    ///
    /// ```rust
    /// use shiori::search::SearchQuery;
    ///
    /// let query = SearchQuery::title("one piece");
    /// assert_eq!(query.text_match(), Some("one piece"));
    /// ```
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            criteria: vec![QueryCriteria::title(text)],
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns `true` if any clause is a title match.
    pub fn has_title_match(&self) -> bool {
        self.criteria.iter().any(QueryCriteria::is_title_match)
    }

    /// The text of the first title match, if any.
    pub fn text_match(&self) -> Option<&str> {
        self.criteria.iter().find_map(|criterion| match criterion {
            QueryCriteria::Match {
                field: SearchableField::TitleName,
                value,
            } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Iterates over included tags.
    pub fn included_tags(&self) -> impl Iterator<Item = &MangaTag> {
        self.criteria.iter().filter_map(|criterion| match criterion {
            QueryCriteria::TagInclude(tag) => Some(tag),
            _ => None,
        })
    }

    /// Iterates over excluded tags.
    pub fn excluded_tags(&self) -> impl Iterator<Item = &MangaTag> {
        self.criteria.iter().filter_map(|criterion| match criterion {
            QueryCriteria::TagExclude(tag) => Some(tag),
            _ => None,
        })
    }
}

impl From<&str> for SearchQuery {
    fn from(text: &str) -> Self {
        SearchQuery::title(text)
    }
}

impl From<String> for SearchQuery {
    fn from(text: String) -> Self {
        SearchQuery::title(text)
    }
}
