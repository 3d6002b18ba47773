use serde::{Deserialize, Serialize};

/// One page of a paginated list resource (search results, reviews)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
    /// Set when malformed entries were dropped while decoding
    #[serde(skip)]
    pub recovered: bool,
}

impl<T> Page<T> {
    /// Page number to request next, if the listing continues
    pub fn next_page(&self) -> Option<u32> {
        if self.page < self.total_pages {
            Some(self.page + 1)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
