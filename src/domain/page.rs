//! Page - One Response of the Paginated Query Endpoint

use serde::{Deserialize, Serialize};

use crate::domain::paper::Paper;

/// Items for one offset/limit window plus the total row count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items starting at the requested offset
    pub items: Vec<T>,
    /// Total rows matching the query
    pub count: usize,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, count: usize) -> Self {
        Self { items, count }
    }

    /// A count-only page
    pub fn count_only(count: usize) -> Self {
        Self {
            items: Vec::new(),
            count,
        }
    }
}

/// Wire shape of the `/papers/` list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperPage {
    /// Papers in the requested window; absent for count-only queries
    #[serde(default)]
    pub papers: Vec<Paper>,
    /// Total number of matching papers
    #[serde(default)]
    pub count: usize,
}

impl From<PaperPage> for Page<Paper> {
    fn from(page: PaperPage) -> Self {
        Page::new(page.papers, page.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_only_response() {
        let wire: PaperPage = serde_json::from_str(r#"{"count": 1234}"#).expect("page");
        let page: Page<Paper> = wire.into();
        assert_eq!(page.count, 1234);
        assert!(page.items.is_empty());
    }
}
