use crate::types::ContentKind;

/// Identifies one span of accumulation: a fixed (kind, keyword) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EpochKey {
    pub kind: ContentKind,
    pub keyword: String,
}

/// Growing result list for the active epoch.
///
/// Pages are folded in with [`Accumulator::advance`]; page 1, a new keyword or
/// a new kind starts a fresh list. Within an epoch a page that is not newer than
/// the last applied one is ignored, so a re-delivered page never duplicates items.
#[derive(Debug, Clone)]
pub struct Accumulator<T> {
    epoch: Option<EpochKey>,
    last_page: u32,
    items: Vec<T>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self { Self { epoch: None, last_page: 0, items: Vec::new() } }
}

impl<T: Clone> Accumulator<T> {
    pub fn new() -> Self { Self::default() }

    /// Folds one page into the list and returns the full snapshot.
    pub fn advance(&mut self, page: u32, keyword: &str, kind: ContentKind, new_items: Vec<T>) -> Vec<T> {
        let page = page.max(1);
        let same_epoch = matches!(&self.epoch, Some(e) if e.kind == kind && e.keyword == keyword);
        if !same_epoch || page == 1 {
            self.items.clear();
            self.epoch = Some(EpochKey { kind, keyword: keyword.to_string() });
            self.last_page = 0;
        } else if page <= self.last_page {
            tracing::debug!(page, last = self.last_page, "ignoring already applied page");
            return self.items.clone();
        }
        self.items.extend(new_items);
        self.last_page = page;
        self.items.clone()
    }

    pub fn epoch(&self) -> Option<&EpochKey> { self.epoch.as_ref() }
    pub fn last_page(&self) -> u32 { self.last_page }
    pub fn items(&self) -> &[T] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// Turns scroll positions into page-advance requests.
///
/// Fires when the last visible index is within `lookahead` items of the end,
/// at most once per list length. An empty page leaves the length unchanged, so
/// paging stops on its own at the end of a listing.
#[derive(Debug, Clone)]
pub struct ScrollPager {
    lookahead: usize,
    page: u32,
    requested_at: Option<usize>,
}

impl ScrollPager {
    pub fn new(lookahead: usize) -> Self { Self { lookahead, page: 1, requested_at: None } }

    /// Start over at page 1 (new keyword or kind).
    pub fn reset(&mut self) {
        self.page = 1;
        self.requested_at = None;
    }

    pub fn page(&self) -> u32 { self.page }

    pub fn observe(&mut self, last_visible: usize, item_count: usize) -> Option<u32> {
        if item_count == 0 || last_visible >= item_count {
            return None;
        }
        let remaining = item_count - 1 - last_visible;
        if remaining > self.lookahead || self.requested_at == Some(item_count) {
            return None;
        }
        self.page += 1;
        self.requested_at = Some(item_count);
        Some(self.page)
    }

    /// The fetch for `page` failed; the next observation near the end asks for it again.
    pub fn failed(&mut self, page: u32) {
        if page == self.page && page > 1 {
            self.page -= 1;
            self.requested_at = None;
        }
    }
}
