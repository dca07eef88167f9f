//! Type definitions shared across crates
//!
//! - `pagination` - Page requests and paged results for list operations

pub mod pagination;

pub use pagination::{PagedResult, Pagination, PaginationError};
