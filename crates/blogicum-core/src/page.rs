//! Page envelopes for listings.

/// Posts per listing page, everywhere a listing appears.
pub const PAGE_SIZE: u64 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Page `page` of [`PAGE_SIZE`]-sized pages. Zero is treated as the
    /// first page; repositories clamp past-the-end requests to the last
    /// page rather than failing.
    pub fn new(page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: PAGE_SIZE,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of results plus the counts a client needs to paginate.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually served (after clamping).
    pub page: u64,
    /// Never zero: an empty listing still has one (empty) page.
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Re-shape the items while keeping the page counts.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}
