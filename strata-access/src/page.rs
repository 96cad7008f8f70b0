//! Pagination types
//!
//! [`PageRequest`] is the caller-facing page specification (1-indexed page
//! number plus page size); [`Page`] is the container a paged query returns.
//! Page sizes are clamped against the engine configuration so a caller cannot
//! request an unbounded page.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Page specification for paged queries
///
/// Both fields are optional on the wire; defaults and limits come from
/// [`EngineConfig`] at resolution time.
///
/// # Example
///
/// ```rust
/// use strata_access::config::EngineConfig;
/// use strata_access::page::PageRequest;
///
/// let config = EngineConfig::default();
/// let request = PageRequest::new().with_page(3).with_size(50);
/// assert_eq!(request.page_number(), 3);
/// assert_eq!(request.effective_size(&config), 50);
/// assert_eq!(request.offset(&config), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    /// Page number (1-indexed); `None` means the first page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Requested page size; `None` means the configured default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl PageRequest {
    /// Create an empty request (first page, default size)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// The 1-indexed page number; page 0 is treated as page 1
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// The effective page size, defaulted and clamped by configuration
    #[must_use]
    pub fn effective_size(&self, config: &EngineConfig) -> u32 {
        self.size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size)
    }

    /// Number of rows to skip for this page
    #[must_use]
    pub fn offset(&self, config: &EngineConfig) -> u64 {
        u64::from(self.page_number().saturating_sub(1)) * u64::from(self.effective_size(config))
    }
}

/// One page of results
///
/// An empty result is an empty page object, never an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The rows of this page
    pub items: Vec<T>,
    /// 1-indexed page number
    pub page: u32,
    /// Effective page size used for the query
    pub size: u32,
    /// Total rows matching the query across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Create a page
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, size: u32, total: u64) -> Self {
        Self {
            items,
            page,
            size,
            total,
        }
    }

    /// An empty page for the given spec
    #[must_use]
    pub fn empty(page: u32, size: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            size,
            total: 0,
        }
    }

    /// Total number of pages implied by `total` and `size`
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(u64::from(self.size))
        }
    }

    /// Number of rows on this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page carries no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map the page contents, keeping the paging metadata
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_access::page::Page;
    ///
    /// let page = Page::new(vec![1, 2, 3], 1, 20, 3);
    /// let doubled = page.map(|n| n * 2);
    /// assert_eq!(doubled.items, vec![2, 4, 6]);
    /// assert_eq!(doubled.total, 3);
    /// ```
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let config = EngineConfig::default();
        let request = PageRequest::new();
        assert_eq!(request.page_number(), 1);
        assert_eq!(request.effective_size(&config), config.default_page_size);
        assert_eq!(request.offset(&config), 0);
    }

    #[test]
    fn test_page_zero_protection() {
        let request = PageRequest::new().with_page(0);
        assert_eq!(request.page_number(), 1);
    }

    #[test]
    fn test_size_clamped_by_config() {
        let config = EngineConfig::default();
        assert_eq!(PageRequest::new().with_size(0).effective_size(&config), 1);
        assert_eq!(
            PageRequest::new().with_size(10_000).effective_size(&config),
            config.max_page_size
        );
    }

    #[test]
    fn test_offset_calculation() {
        let config = EngineConfig::default();
        assert_eq!(PageRequest::new().with_page(2).with_size(20).offset(&config), 20);
        assert_eq!(PageRequest::new().with_page(3).with_size(50).offset(&config), 100);
    }

    #[test]
    fn test_page_request_wire_shape() {
        let request: PageRequest = serde_json::from_str(r#"{"page": 2, "size": 25}"#).unwrap();
        assert_eq!(request.page, Some(2));
        assert_eq!(request.size, Some(25));
        let empty: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PageRequest::new());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Page::<i32>::empty(1, 20).total_pages(), 0);
        assert_eq!(Page::new(vec![1], 1, 20, 41).total_pages(), 3);
        assert_eq!(Page::new(vec![1], 1, 20, 40).total_pages(), 2);
    }

    #[test]
    fn test_empty_page_object() {
        let page = Page::<String>::empty(4, 10);
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
        assert_eq!(page.page, 4);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_map_preserves_metadata() {
        let page = Page::new(vec!["a", "bb"], 2, 10, 12);
        let mapped = page.map(str::len);
        assert_eq!(mapped.items, vec![1, 2]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.size, 10);
        assert_eq!(mapped.total, 12);
    }
}
