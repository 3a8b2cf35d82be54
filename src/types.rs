//! Core data types for sources, manga, chapters, pages and favicons.
//!
//! This module defines the normalized records every adapter produces:
//!
//! - [`SourceInfo`] - Static description of an adapter's website
//! - [`Manga`] - A manga/comic series with metadata
//! - [`Chapter`] - A single chapter of a manga
//! - [`Page`] - A single page image of a chapter
//! - [`Favicons`] - Icons advertised by a source's website
//! - [`SortOrder`] - Sorting options for listings
//!
//! The runtime never builds or edits these records itself, it only passes
//! them between adapters and callers.
//!
//! # Examples
//!
//! ```rust
//! use shiori::types::*;
//!
//! let mut manga = Manga::new("mangadex", "one-piece", "One Piece");
//! manga.authors.push("Oda Eiichiro".to_string());
//! manga.tags.push(MangaTag::new("action", "Action"));
//! assert_eq!(manga.source_id, "mangadex");
//! ```

use serde::{Deserialize, Serialize};

/// Classification of the content a source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Manga,
    Manhwa,
    Manhua,
    Comics,
    Hentai,
    Novel,
    Other,
}

/// Static description of a source website.
///
/// Defined once per adapter, usually as a `const`, and never mutated.
///
/// ```rust
/// use shiori::types::{ContentType, SourceInfo};
///
/// const EXAMPLE: SourceInfo = SourceInfo::new("example", "Example", "en", ContentType::Manga);
/// assert!(!EXAMPLE.is_adult());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceInfo {
    /// Unique identifier of the source
    pub id: &'static str,

    /// Display name
    pub title: &'static str,

    /// Language of the published content, empty for multi-language sources
    pub locale: &'static str,

    /// Content classification
    pub content_type: ContentType,
}

impl SourceInfo {
    pub const fn new(
        id: &'static str,
        title: &'static str,
        locale: &'static str,
        content_type: ContentType,
    ) -> Self {
        Self {
            id,
            title,
            locale,
            content_type,
        }
    }

    /// Returns `true` for sources whose whole catalog is adult content.
    pub fn is_adult(&self) -> bool {
        self.content_type == ContentType::Hentai
    }

    /// Content rating implied by the source itself, if any.
    pub fn content_rating(&self) -> Option<ContentRating> {
        self.is_adult().then_some(ContentRating::Adult)
    }
}

/// Publication state of a manga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MangaState {
    Ongoing,
    Finished,
    Abandoned,
    Paused,
    Upcoming,
}

/// Audience rating of a manga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentRating {
    Safe,
    Suggestive,
    Adult,
}

/// A genre tag as exposed by a source.
///
/// `key` is the value the source expects in its own query parameters, `title`
/// is the human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MangaTag {
    pub key: String,
    pub title: String,
}

impl MangaTag {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }
}

/// Represents a manga/comic series with all its metadata.
///
/// Each manga has a unique ID within its source. `chapters` is `None` for
/// list results and filled in by [`Source::details`](crate::Source::details).
///
/// # Fields
///
/// * `id` - Unique identifier within the source
/// * `url` - Source-relative URL used by the adapter
/// * `public_url` - Absolute URL a browser can open
/// * `title` - The main title of the manga
/// * `alt_titles` - Alternative and translated titles
/// * `cover_url` - Optional URL to the cover image
/// * `authors` - List of author names
/// * `tags` - Genre tags and categories
/// * `state` - Publication state, if known
/// * `description` - Optional plot summary
/// * `content_rating` - Audience rating, if known
/// * `chapters` - Chapter list, only present after fetching details
/// * `source_id` - Identifier of the source this manga came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manga {
    pub id: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub public_url: String,

    pub title: String,

    #[serde(default)]
    pub alt_titles: Vec<String>,

    pub cover_url: Option<String>,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub tags: Vec<MangaTag>,

    pub state: Option<MangaState>,

    pub description: Option<String>,

    pub content_rating: Option<ContentRating>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<Chapter>>,

    pub source_id: String,
}

impl Manga {
    /// Creates a manga record with only the identifying fields set.
    pub fn new(
        source_id: impl Into<String>,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: String::new(),
            public_url: String::new(),
            title: title.into(),
            alt_titles: Vec::new(),
            cover_url: None,
            authors: Vec::new(),
            tags: Vec::new(),
            state: None,
            description: None,
            content_rating: None,
            chapters: None,
            source_id: source_id.into(),
        }
    }

    /// Iterates over the main title followed by every alternative title.
    pub fn all_titles(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.alt_titles.iter().map(String::as_str))
    }

    /// Returns `true` if this is the same entry of the same source.
    pub fn is_same(&self, other: &Manga) -> bool {
        self.id == other.id && self.source_id == other.source_id
    }
}

/// Represents a single chapter of a manga.
///
/// The chapter number can be decimal to support special chapters like
/// "Chapter 5.5". `volume` is `0` when the source does not group by volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: Option<String>,
    pub number: f64,
    #[serde(default)]
    pub volume: u32,
    pub url: String,
    pub scanlator: Option<String>,
    /// Translation branch, e.g. a language or a team
    pub branch: Option<String>,
    pub source_id: String,
}

/// A single page image of a chapter.
///
/// `url` may be an intermediate link; call
/// [`Source::page_url`](crate::Source::page_url) to get the direct image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub url: String,
    pub preview: Option<String>,
    pub source_id: String,
}

/// A single icon advertised by a website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favicon {
    pub url: String,
    /// Edge length in pixels, `0` when unknown
    pub size: u32,
    pub rel: Option<String>,
}

/// The set of icons advertised by a source's website.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Favicons {
    pub icons: Vec<Favicon>,
    /// Referer to send when downloading the icons
    pub referer: String,
}

impl Favicons {
    pub fn new(icons: Vec<Favicon>, referer: impl Into<String>) -> Self {
        Self {
            icons,
            referer: referer.into(),
        }
    }

    /// Finds the icon best suited for the requested size.
    ///
    /// Prefers the smallest icon at least `size` pixels wide and falls back to
    /// the largest available one.
    ///
    /// ```rust
    /// use shiori::types::{Favicon, Favicons};
    ///
    /// let icon = |size| Favicon { url: format!("/{size}.png"), size, rel: None };
    /// let favicons = Favicons::new(vec![icon(16), icon(64), icon(32)], "https://example.com");
    /// assert_eq!(favicons.find(20).map(|f| f.size), Some(32));
    /// assert_eq!(favicons.find(128).map(|f| f.size), Some(64));
    /// ```
    pub fn find(&self, size: u32) -> Option<&Favicon> {
        self.icons
            .iter()
            .filter(|icon| icon.size >= size)
            .min_by_key(|icon| icon.size)
            .or_else(|| self.icons.iter().max_by_key(|icon| icon.size))
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Defines how listings should be sorted.
///
/// Variants are declared in preference order: when a caller does not pick an
/// order, the first variant an adapter supports becomes its default (see
/// [`SortOrder::preferred`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Updated,
    UpdatedAsc,
    Popularity,
    PopularityAsc,
    PopularityToday,
    PopularityWeek,
    PopularityMonth,
    PopularityYear,
    Rating,
    RatingAsc,
    Newest,
    NewestAsc,
    Alphabetical,
    AlphabeticalDesc,
    Added,
    AddedAsc,
    Relevance,
}

impl SortOrder {
    /// Every sort order, in preference order.
    pub const ALL: [SortOrder; 17] = [
        SortOrder::Updated,
        SortOrder::UpdatedAsc,
        SortOrder::Popularity,
        SortOrder::PopularityAsc,
        SortOrder::PopularityToday,
        SortOrder::PopularityWeek,
        SortOrder::PopularityMonth,
        SortOrder::PopularityYear,
        SortOrder::Rating,
        SortOrder::RatingAsc,
        SortOrder::Newest,
        SortOrder::NewestAsc,
        SortOrder::Alphabetical,
        SortOrder::AlphabeticalDesc,
        SortOrder::Added,
        SortOrder::AddedAsc,
        SortOrder::Relevance,
    ];

    /// Picks the most preferred order contained in `available`.
    ///
    /// The order of `available` itself is irrelevant, only the declaration
    /// order of [`SortOrder`] counts.
    ///
    /// ```rust
    /// use shiori::SortOrder;
    ///
    /// let available = [SortOrder::Relevance, SortOrder::Alphabetical, SortOrder::Popularity];
    /// assert_eq!(SortOrder::preferred(&available), Some(SortOrder::Popularity));
    /// assert_eq!(SortOrder::preferred(&[]), None);
    /// ```
    pub fn preferred(available: &[SortOrder]) -> Option<SortOrder> {
        Self::ALL
            .into_iter()
            .find(|order| available.contains(order))
    }
}
