//! Favicon discovery from a source's main page.

use reqwest::header::HeaderMap;
use url::Url;

use crate::{
    error::{Error, Result},
    net::{Transport, html},
    types::{Favicon, Favicons},
};

const ICON_SELECTOR: &str =
    "link[rel~=icon], link[rel=apple-touch-icon], link[rel=apple-touch-icon-precomposed]";

/// Reads the icons a website advertises in its `<head>`.
///
/// `/favicon.ico` is always included as a last resort, even when the page
/// does not mention it.
pub struct FaviconParser<'a> {
    transport: &'a dyn Transport,
    domain: &'a str,
}

impl<'a> FaviconParser<'a> {
    pub fn new(transport: &'a dyn Transport, domain: &'a str) -> Self {
        Self { transport, domain }
    }

    pub async fn parse(&self) -> Result<Favicons> {
        let base = format!("https://{}/", self.domain);
        let response = self.transport.get(&base, HeaderMap::new()).await?;
        let body = response.text()?;
        parse_favicons(&body, response.url.as_str())
    }
}

/// Extracts favicons from a page body fetched from `page_url`.
pub fn parse_favicons(body: &str, page_url: &str) -> Result<Favicons> {
    let page = Url::parse(page_url)
        .map_err(|e| Error::parse(format!("Invalid URL {}: {}", page_url, e)))?;

    let document = html::parse(body);
    let base = html::select_attr(&document, "base[href]", "href")
        .and_then(|href| page.join(&href).ok())
        .unwrap_or_else(|| page.clone());

    let mut icons = html::parse_items(&document, ICON_SELECTOR, |attrs| {
        let href = attrs.get("href")?;
        let url = base.join(href).ok()?;
        Some(Favicon {
            url: url.to_string(),
            size: attrs.get("sizes").map(|s| parse_size(s)).unwrap_or(0),
            rel: attrs.get("rel").cloned(),
        })
    });

    if let Ok(fallback) = page.join("/favicon.ico") {
        let fallback = fallback.to_string();
        if !icons.iter().any(|icon| icon.url == fallback) {
            icons.push(Favicon {
                url: fallback,
                size: 0,
                rel: None,
            });
        }
    }

    Ok(Favicons::new(icons, page.as_str()))
}

/// Largest edge length in a `sizes` attribute such as `"16x16 32x32"`.
fn parse_size(sizes: &str) -> u32 {
    sizes
        .split_whitespace()
        .filter_map(|size| size.split(['x', 'X']).next()?.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
            <link rel="icon" href="/static/icon-32.png" sizes="32x32">
            <link rel="shortcut icon" href="https://cdn.example.com/icon.ico">
            <link rel="apple-touch-icon" href="touch.png" sizes="180x180">
            <link rel="stylesheet" href="/style.css">
        </head></html>
    "#;

    #[test]
    fn collects_icons_with_absolute_urls() {
        let favicons = parse_favicons(PAGE, "https://example.com/home").unwrap();
        let urls: Vec<&str> = favicons.icons.iter().map(|icon| icon.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/static/icon-32.png",
                "https://cdn.example.com/icon.ico",
                "https://example.com/touch.png",
                "https://example.com/favicon.ico",
            ]
        );
        assert_eq!(favicons.find(100).map(|icon| icon.size), Some(180));
    }

    #[test]
    fn size_attribute() {
        assert_eq!(parse_size("16x16 48x48"), 48);
        assert_eq!(parse_size("any"), 0);
    }
}
