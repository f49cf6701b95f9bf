use serde::{Deserialize, Serialize};

/// Pagination metadata returned by every list endpoint.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageMetadata {
    pub page_size: u32,
    pub current_page: u32,
    pub total_data: u32,
    pub total_pages: u32,
}

/// One page of a list endpoint: `{data: T[], metadata}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "crate::domain::types::null_as_empty")]
    pub data: Vec<T>,
    #[serde(default)]
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_data_decodes_as_empty_page() {
        let page: Page<u32> = serde_json::from_value(json!({
            "data": null,
            "metadata": {"page_size": 10, "current_page": 1, "total_data": 0, "total_pages": 0}
        }))
        .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.metadata.page_size, 10);
    }
}
