use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Offset pagination as used by the infinite-scroll song lists.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OffsetQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl OffsetQuery {
    pub fn limit_or(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage<T> {
    pub data: Vec<T>,
    pub limit: u32,
    pub offset: u32,
    pub total: u64,
    pub has_more: bool,
}

impl<T> OffsetPage<T> {
    pub fn new(data: Vec<T>, limit: u32, offset: u32, total: u64) -> Self {
        let has_more = has_more(offset, data.len(), total);
        Self {
            data,
            limit,
            offset,
            total,
            has_more,
        }
    }
}

pub fn has_more(offset: u32, returned: usize, total: u64) -> bool {
    (offset as u64) + (returned as u64) < total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let query = OffsetQuery {
            limit: Some(500),
            offset: None,
        };
        assert_eq!(query.limit_or(DEFAULT_PAGE_LIMIT), MAX_PAGE_LIMIT);
        assert_eq!(query.offset(), 0);

        let query = OffsetQuery {
            limit: Some(0),
            offset: Some(4),
        };
        assert_eq!(query.limit_or(DEFAULT_PAGE_LIMIT), 1);
        assert_eq!(query.offset(), 4);

        assert_eq!(OffsetQuery::default().limit_or(10), 10);
    }

    #[test]
    fn test_has_more() {
        assert!(has_more(0, 2, 3));
        assert!(!has_more(2, 1, 3));
        assert!(!has_more(0, 0, 0));
        assert!(!has_more(10, 0, 3));
    }
}
