use crate::error::{Result, StatsError};
use crate::models::PageRequest;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 5;

impl PageRequest {
    /// Turns raw paging input into a request. An absent value or zero means
    /// "not specified" and takes the default (page 1, five rows). Negative
    /// values are kept as they are so that ranking rejects them.
    pub fn resolve(raw_page: Option<i64>, raw_page_size: Option<i64>) -> Self {
        let page = match raw_page {
            None | Some(0) => DEFAULT_PAGE,
            Some(page) => page,
        };
        let page_size = match raw_page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size,
        };
        Self { page, page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

// A page request that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub page: usize,
    pub page_size: usize,
}

impl Window {
    pub fn validate(request: PageRequest) -> Result<Self> {
        let page = positive("page", request.page)?;
        let page_size = positive("page_size", request.page_size)?;
        Ok(Self { page, page_size })
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    // Half-open index range of this page, clamped to `total_items`
    pub fn bounds(&self, total_items: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size);
        (start.min(total_items), end.min(total_items))
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize> {
    if value < 1 {
        return Err(StatsError::invalid(name, format!("{} (must be at least 1)", value)));
    }
    usize::try_from(value).map_err(|_| StatsError::invalid(name, format!("{} (too large)", value)))
}
