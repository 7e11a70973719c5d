use mes_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Page size used when a caller asks for a page without a size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size accepted from callers.
pub const MAX_PAGE_SIZE: usize = 200;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Validates a page request.
    pub fn new(page: usize, size: Option<usize>) -> AppResult<Self> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self { page, size })
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Cuts one page out of a fully materialized, already ordered list.
    #[must_use]
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total_elements = items.len();
        let content = items
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect();

        Page {
            content,
            total_elements,
        }
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub content: Vec<T>,
    /// Row count across all pages.
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Maps page rows while keeping the total.
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(mapper).collect(),
            total_elements: self.total_elements,
        }
    }
}
