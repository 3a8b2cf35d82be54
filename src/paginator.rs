//! Offset to page translation for page-indexed remote listings.
//!
//! Callers address listings by a logical `offset` into the overall result
//! stream, while most sites only understand page numbers and do not publish a
//! reliable page size. A [`Paginator`] starts from the adapter's nominal page
//! size and learns the real one from the pages it sees.
//!
//! ```rust
//! use shiori::paginator::Paginator;
//!
//! let paginator = Paginator::new(20);
//! assert_eq!(paginator.get_page(0), 1);
//!
//! // the site actually serves 24 items per page
//! paginator.on_list_received(0, 1, 24);
//! assert_eq!(paginator.get_page(24), 2);
//! assert_eq!(paginator.get_page(47), 2);
//! assert_eq!(paginator.get_page(48), 3);
//! ```

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy)]
struct PaginationState {
    first_page: u32,
    page_size: usize,
}

/// Learned pagination state for one listing kind of one adapter.
///
/// The state sits behind a mutex so each update is atomic, but overlapping
/// requests against the same listing are not ordered: the last one to finish
/// decides the learned size.
#[derive(Debug)]
pub struct Paginator {
    state: Mutex<PaginationState>,
}

impl Paginator {
    /// Creates a paginator with a nominal page size and a first page of `1`.
    ///
    /// A nominal size of `0` is treated as `1`.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: Mutex::new(PaginationState {
                first_page: 1,
                page_size: page_size.max(1),
            }),
        }
    }

    /// Sets the index of the first remote page, usually `0` or `1`.
    pub fn set_first_page(&self, first_page: u32) {
        self.state.lock().first_page = first_page;
    }

    pub fn first_page(&self) -> u32 {
        self.state.lock().first_page
    }

    /// The page size currently used for offset mapping.
    pub fn page_size(&self) -> usize {
        self.state.lock().page_size
    }

    /// Maps a logical offset to the remote page that contains it.
    pub fn get_page(&self, offset: usize) -> u32 {
        let state = *self.state.lock();
        let index = offset / state.page_size;
        state
            .first_page
            .saturating_add(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Folds the size of a fetched page into the learned state.
    ///
    /// Empty pages teach nothing. The first page of a listing is always a full
    /// page, later pages only count when they are larger than the current
    /// size; a shorter later page is the tail of the listing.
    ///
    /// A site that shrinks its page size mid-walk is therefore only picked up
    /// on the next fetch of the first page. Until then offsets past the first
    /// page map one page too far.
    pub fn on_list_received(&self, offset: usize, page: u32, count: usize) {
        if count == 0 {
            return;
        }
        let mut state = self.state.lock();
        let is_full = page <= state.first_page || count > state.page_size;
        if is_full && count != state.page_size {
            tracing::debug!(
                offset,
                page,
                previous = state.page_size,
                learned = count,
                "page size changed"
            );
            state.page_size = count;
        }
    }
}
