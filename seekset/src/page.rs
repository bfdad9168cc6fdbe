//! Page results returned by the orchestrators.
//!
//! Both types serialize with camelCase field names:
//!
//! ```json
//! {
//!     "data": [...],
//!     "totalCount": 30,
//!     "pageSize": 20,
//!     "hasPrevious": false,
//!     "hasNext": true
//! }
//! ```

use serde::Serialize;

/// One keyset page.
///
/// `data` is always in the definition's logical order, whichever way the
/// underlying query walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysetPage<T> {
    /// Rows of this page.
    pub data: Vec<T>,
    /// Rows in the unfiltered source.
    pub total_count: u64,
    /// Resolved page size (after defaulting and clamping).
    pub page_size: u64,
    /// Whether any row sorts before the first row of this page.
    pub has_previous: bool,
    /// Whether any row sorts after the last row of this page.
    pub has_next: bool,
}

impl<T> KeysetPage<T> {
    /// An empty page with both flags false.
    #[must_use]
    pub const fn empty(total_count: u64, page_size: u64) -> Self {
        Self {
            data: Vec::new(),
            total_count,
            page_size,
            has_previous: false,
            has_next: false,
        }
    }

    /// Project the rows, keeping the bookkeeping.
    pub fn map<U, F>(self, f: F) -> KeysetPage<U>
    where
        F: FnMut(T) -> U,
    {
        KeysetPage {
            data: self.data.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }

    /// The first row, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    /// The last row, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.data.last()
    }
}

/// One offset page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage<T> {
    /// Rows of this page.
    pub data: Vec<T>,
    /// Rows in the source.
    pub total_count: u64,
    /// Resolved page size.
    pub page_size: u64,
    /// 1-based page number actually served.
    pub page: u64,
}

impl<T> OffsetPage<T> {
    /// Project the rows, keeping the bookkeeping.
    pub fn map<U, F>(self, f: F) -> OffsetPage<U>
    where
        F: FnMut(T) -> U,
    {
        OffsetPage {
            data: self.data.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            page: self.page,
        }
    }

    /// Number of pages at this page size.
    #[must_use]
    pub const fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }
}
