//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Default number of items returned when no limit is given.
pub const DEFAULT_LIMIT: u32 = 7;
/// Upper bound applied to any requested limit.
pub const MAX_LIMIT: u32 = 57;

/// Limit/offset window for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

impl PageRequest {
    /// Create a new page request, clamping the limit to `1..=MAX_LIMIT`.
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }

    /// Build a page request from optional query values.
    pub fn from_parts(limit: Option<u32>, offset: Option<u64>) -> Self {
        Self::new(limit.unwrap_or(DEFAULT_LIMIT), offset.unwrap_or(0))
    }

    /// SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// Apply this window to an in-memory iterator.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}
