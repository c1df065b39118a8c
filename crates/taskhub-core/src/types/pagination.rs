//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 10;
/// Maximum page size.
pub const MAX_LIMIT: u64 = 100;

/// Request parameters for paginated queries (`skip` rows, then `limit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of rows to skip.
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of rows returned.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageRequest {
    /// Create a page request, clamping `limit` into `1..=MAX_LIMIT`.
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// The SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        i64::try_from(self.skip).unwrap_or(i64::MAX)
    }

    /// The SQL `LIMIT` value.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Apply this window to an already ordered iterator.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in this window.
    pub items: Vec<T>,
    /// Rows skipped before this window.
    pub skip: u64,
    /// Requested window size.
    pub limit: u64,
    /// Total number of matching rows.
    pub total: u64,
    /// Whether rows exist past this window.
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: &PageRequest, total: u64) -> Self {
        let has_more = page.skip.saturating_add(items.len() as u64) < total;
        Self {
            items,
            skip: page.skip,
            limit: page.limit,
            total,
            has_more,
        }
    }

    /// Map the items, keeping the window metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            items: self.items.into_iter().map(f).collect(),
            skip: self.skip,
            limit: self.limit,
            total: self.total,
            has_more: self.has_more,
        }
    }
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).limit, 1);
        assert_eq!(PageRequest::new(0, 500).limit, MAX_LIMIT);
        assert_eq!(PageRequest::default().limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_apply_windows_items() {
        let page = PageRequest::new(2, 3);
        assert_eq!(page.apply(0..10), vec![2, 3, 4]);
        assert!(PageRequest::new(20, 5).apply(0..10).is_empty());
    }

    #[test]
    fn test_has_more() {
        let page = PageRequest::new(0, 2);
        let resp = PageResponse::new(vec![1, 2], &page, 5);
        assert!(resp.has_more);
        let last = PageResponse::new(vec![5], &PageRequest::new(4, 2), 5);
        assert!(!last.has_more);
    }
}
