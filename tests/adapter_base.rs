//! Tests for the shared adapter state: configuration, headers and favicons.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, USER_AGENT};
use serde_json::json;
use shiori::config::{ConfigKey, ConfigStore, KEY_DOMAIN, KEY_USER_AGENT, MemoryConfigStore};
use shiori::error::Result;
use shiori::net::{Response, Transport};
use shiori::prelude::*;
use shiori::types::ContentType;
use std::sync::Arc;
use url::Url;

const INFO: SourceInfo = SourceInfo::new("mirrors", "Mirrors", "en", ContentType::Manga);
const MIRRORS: &[&str] = &["mirror-one.test", "mirror-two.test"];

/// Serves a fixed main page and remembers requested URLs.
#[derive(Default)]
struct StaticTransport {
    requested: Mutex<Vec<String>>,
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str, _headers: HeaderMap) -> Result<Response> {
        self.requested.lock().push(url.to_string());
        Ok(Response {
            url: Url::parse(url).unwrap(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(
                br#"<html><head><link rel="icon" href="/icon.png" sizes="64x64"></head></html>"#,
            ),
        })
    }

    async fn post(&self, url: &str, _body: Bytes, headers: HeaderMap) -> Result<Response> {
        self.get(url, headers).await
    }
}

fn base_with(store: Arc<MemoryConfigStore>) -> (Arc<StaticTransport>, ParserBase) {
    let transport = Arc::new(StaticTransport::default());
    let context = ParserContext::new(store, transport.clone(), "Shiori/test");
    (transport, ParserBase::new(&context, INFO, MIRRORS))
}

#[cfg(test)]
mod adapter_base_tests {
    use super::*;

    #[test]
    fn test_defaults_without_stored_values() {
        let (_, base) = base_with(Arc::new(MemoryConfigStore::new()));

        assert_eq!(base.domain(), "mirror-one.test");
        assert_eq!(base.user_agent(), "Shiori/test");
        assert_eq!(base.request_headers()[USER_AGENT], "Shiori/test");
    }

    #[test]
    fn test_stored_domain_is_used() {
        let store = Arc::new(MemoryConfigStore::new());
        store.set(INFO.id, KEY_DOMAIN, json!("mirror-two.test"));
        let (_, base) = base_with(store);

        assert_eq!(base.domain(), "mirror-two.test");
        assert_eq!(base.absolute_url("/manga/1"), "https://mirror-two.test/manga/1");
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let store = Arc::new(MemoryConfigStore::new());
        store.set(INFO.id, KEY_DOMAIN, json!(42));
        store.set(INFO.id, KEY_USER_AGENT, json!(["not", "a", "string"]));
        let (_, base) = base_with(store);

        assert_eq!(base.domain(), "mirror-one.test");
        assert_eq!(base.user_agent(), "Shiori/test");
    }

    #[test]
    fn test_values_are_scoped_per_source() {
        let store = Arc::new(MemoryConfigStore::new());
        store.set("somebody-else", KEY_DOMAIN, json!("mirror-two.test"));
        let (_, base) = base_with(store);

        assert_eq!(base.domain(), "mirror-one.test");
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let (_, base) = base_with(Arc::new(MemoryConfigStore::new()));
        let key = ConfigKey::show_suspicious_content(false);

        assert!(!base.config().get(&key));
        base.config().set(&key, true).unwrap();
        assert!(base.config().get(&key));
    }

    #[test]
    fn test_registered_keys_list_mirrors() {
        let (_, base) = base_with(Arc::new(MemoryConfigStore::new()));
        let mut keys = Vec::new();
        base.on_create_config(&mut keys);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].name, KEY_DOMAIN);
        assert_eq!(keys[0].default, json!("mirror-one.test"));
        assert_eq!(keys[0].presets.len(), 2);
        assert_eq!(keys[1].name, KEY_USER_AGENT);
    }

    #[test]
    fn test_absolute_url_forms() {
        let (_, base) = base_with(Arc::new(MemoryConfigStore::new()));

        assert_eq!(base.absolute_url("https://cdn.test/a.jpg"), "https://cdn.test/a.jpg");
        assert_eq!(base.absolute_url("//cdn.test/a.jpg"), "https://cdn.test/a.jpg");
        assert_eq!(base.absolute_url("chapter/2"), "https://mirror-one.test/chapter/2");
    }

    #[tokio::test]
    async fn test_favicons_from_main_page() {
        let (transport, base) = base_with(Arc::new(MemoryConfigStore::new()));

        let favicons = base.favicons().await.unwrap();

        assert_eq!(*transport.requested.lock(), vec!["https://mirror-one.test/"]);
        assert_eq!(favicons.referer, "https://mirror-one.test/");
        let urls: Vec<&str> = favicons.icons.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://mirror-one.test/icon.png", "https://mirror-one.test/favicon.ico"]
        );
        assert_eq!(favicons.find(32).map(|i| i.size), Some(64));
    }
}
