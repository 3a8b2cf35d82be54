//! HTML helpers built on `scraper`.
//!
//! Parsing is synchronous and [`Html`] documents are not `Send`, so callers
//! parse after the last `.await` and drop the document before awaiting again.
//!
//! ```rust
//! use shiori::net::html;
//!
//! let document = html::parse(r#"<head><link rel="icon" href="/favicon.png"><title>Site</title></head>"#);
//! assert_eq!(html::select_text(&document, "title").as_deref(), Some("Site"));
//! assert_eq!(html::select_attr(&document, "link", "href").as_deref(), Some("/favicon.png"));
//! ```

use rayon::prelude::*;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Parses an HTML document from a string.
pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// Trimmed text content of the first element matching `selector`.
pub fn select_text(html: &Html, selector: &str) -> Option<String> {
    Selector::parse(selector).ok().and_then(|sel| {
        html.select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    })
}

/// Value of `attr` on the first element matching `selector`.
pub fn select_attr(html: &Html, selector: &str, attr: &str) -> Option<String> {
    Selector::parse(selector).ok().and_then(|sel| {
        html.select(&sel)
            .next()
            .and_then(|el| el.value().attr(attr).map(String::from))
    })
}

/// Maps every element matching `selector` through `parser`, in parallel.
///
/// The parser sees the element's attributes by name. Elements for which it
/// returns `None` are skipped; document order is preserved. An invalid
/// selector yields an empty list.
pub fn parse_items<T, F>(html: &Html, selector: &str, parser: F) -> Vec<T>
where
    T: Send,
    F: Fn(&HashMap<String, String>) -> Option<T> + Sync,
{
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };

    // scraper nodes are not Sync, copy the attributes out first
    let elements: Vec<HashMap<String, String>> = html
        .select(&sel)
        .map(|el| {
            el.value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect()
        })
        .collect();

    elements.par_iter().filter_map(|attrs| parser(attrs)).collect()
}
