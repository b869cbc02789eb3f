//! Paginated list envelopes.

use serde::{Deserialize, Serialize};

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Total number of items across all pages.
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    #[serde(default)]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Returns true if another page follows this one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns true if a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// A list endpoint that answers either with a bare array or with a page,
/// depending on server-side pagination settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListOrPage<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> ListOrPage<T> {
    /// The number of items the server reports.
    ///
    /// For a page this is the total `count`, not the page length.
    pub fn count(&self) -> u64 {
        match self {
            ListOrPage::List(items) => items.len() as u64,
            ListOrPage::Page(page) => page.count,
        }
    }

    /// The items in this response.
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListOrPage::List(items) => items,
            ListOrPage::Page(page) => page.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array() {
        let list: ListOrPage<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(list.count(), 3);
        assert_eq!(list.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn paginated() {
        let list: ListOrPage<u32> = serde_json::from_value(json!({
            "count": 12,
            "next": "http://127.0.0.1:8000/api/notifications/unread/?page=2",
            "previous": null,
            "results": [1, 2]
        }))
        .unwrap();
        assert_eq!(list.count(), 12);
        assert_eq!(list.into_items(), vec![1, 2]);
    }

    #[test]
    fn results_without_count() {
        let list: ListOrPage<u32> = serde_json::from_value(json!({"results": [4, 5]})).unwrap();
        assert_eq!(list.into_items(), vec![4, 5]);

        let empty: ListOrPage<u32> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_items().is_empty());
    }

    #[test]
    fn page_navigation() {
        let page: Page<u32> = serde_json::from_value(json!({
            "count": 1,
            "results": [7]
        }))
        .unwrap();
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
