//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};
use validator::Validate;

use taskhub_core::types::PageRequest;
use taskhub_core::types::pagination::DEFAULT_LIMIT;

/// `?skip=&limit=` for list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PaginationParams {
    /// Rows to skip (default: 0).
    #[serde(default)]
    pub skip: u64,
    /// Rows to return (default: 10, max: 100).
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.skip, self.limit)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
