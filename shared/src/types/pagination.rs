//! Page-based pagination for owner-scoped listings

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page request for list operations
///
/// Pages are 1-indexed. A request with `page == 0` or `page_size == 0`
/// is a caller contract violation and is rejected by [`Pagination::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Pagination {
    /// Create a new pagination request without adjusting the values
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Verify the request bounds
    pub fn check(&self) -> Result<(), PaginationError> {
        if self.page < 1 {
            return Err(PaginationError::PageOutOfRange { page: self.page });
        }
        if self.page_size == 0 {
            return Err(PaginationError::EmptyPage);
        }
        Ok(())
    }

    /// Number of rows to skip before the window starts
    ///
    /// Widened to `u64` so that large page numbers cannot overflow.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Maximum number of rows in the window
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Rejected pagination bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers start at 1
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange { page: u32 },

    /// Page size must be positive
    #[error("page size must be greater than 0")]
    EmptyPage,
}

/// One window of results plus the size of the whole result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in this window, at most `page_size` of them
    pub results: Vec<T>,

    /// Count of all matching items across every page
    pub total: u64,
}

impl<T> PagedResult<T> {
    /// Create a new paged result
    pub fn new(results: Vec<T>, total: u64) -> Self {
        Self { results, total }
    }
}

// Constants
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 25;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
