//! Tests for offset based listing over single-page and paged sources.

use shiori::prelude::*;
use shiori::paginator::Paginator;
use std::sync::Arc;

mod common;
use common::{FakeSource, titled};

fn wrap(source: FakeSource) -> (Arc<FakeSource>, ParserWrapper) {
    let source = Arc::new(source);
    let wrapper = ParserWrapper::new(source.clone(), WorkerPool::current().unwrap());
    (source, wrapper)
}

#[cfg(test)]
mod pagination_tests {
    use super::*;

    #[tokio::test]
    async fn test_walks_listing_with_learned_page_size() {
        // the adapter expects 20 items per page, the site serves 24
        let (source, wrapper) =
            wrap(FakeSource::new().with_catalog(titled("item", 72)).paged(20, 24));

        let mut offset = 0;
        let mut seen = Vec::new();
        loop {
            let page = wrapper
                .search(SearchQuery::default().with_offset(offset))
                .await
                .unwrap();
            if page.is_empty() {
                break;
            }
            offset += page.len();
            seen.extend(page);
        }

        assert_eq!(seen.len(), 72);
        assert_eq!(*source.pages_requested.lock(), vec![1, 2, 3, 4]);
        let ids: std::collections::HashSet<_> = seen.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids.len(), 72);
    }

    #[tokio::test]
    async fn test_single_page_source_ignores_later_offsets() {
        let (source, wrapper) = wrap(FakeSource::new().with_catalog(titled("item", 7)));

        let first = wrapper.search(SearchQuery::default()).await.unwrap();
        let second = wrapper
            .search(SearchQuery::default().with_offset(first.len()))
            .await
            .unwrap();

        assert_eq!(first.len(), 7);
        assert!(second.is_empty());
        // the adapter is reached, its listing strategy answers without fetching
        assert_eq!(source.search_calls(), 2);
    }

    #[test]
    fn test_page_is_monotonic_in_offset() {
        for page_size in [1, 7, 20, 24] {
            let paginator = Paginator::new(page_size);
            let mut last = paginator.get_page(0);
            for offset in 1..200 {
                let page = paginator.get_page(offset);
                assert!(page >= last, "offset {} went back a page", offset);
                last = page;
            }
            for k in 0..10 {
                let start = k * page_size;
                assert_eq!(paginator.get_page(start), paginator.get_page(start + page_size - 1));
                assert!(paginator.get_page(start + page_size) > paginator.get_page(start));
            }
        }
    }

    #[test]
    fn test_learning_is_idempotent() {
        let once = Paginator::new(20);
        once.on_list_received(0, 1, 24);

        let twice = Paginator::new(20);
        twice.on_list_received(0, 1, 24);
        twice.on_list_received(0, 1, 24);

        assert_eq!(once.page_size(), twice.page_size());
        for offset in [0, 23, 24, 100] {
            assert_eq!(once.get_page(offset), twice.get_page(offset));
        }
    }

    #[test]
    fn test_short_tail_page_keeps_size() {
        let paginator = Paginator::new(20);
        paginator.on_list_received(0, 1, 24);
        paginator.on_list_received(48, 3, 5);
        assert_eq!(paginator.page_size(), 24);
    }
}
