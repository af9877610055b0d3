//! Page request and page window primitives shared by back-office grids.
//!
//! Listing screens page through filtered result sets with a 1-based page
//! number and a page size. [`PageRequest`] validates that pair once and
//! derives the storage offset from it; [`PageWindow`] carries one page of
//! rows together with the total match count so callers can render pagers
//! without re-querying.
//!
//! Requests are never clamped: asking for a page past the end yields an
//! empty window whose `total` still reports the true match count.
//!
//! # Example
//!
//! ```
//! use pagination::{PageRequest, PageWindow};
//!
//! let request = PageRequest::try_new(3, 20).expect("valid request");
//! assert_eq!(request.offset(), 40);
//!
//! let window = PageWindow::new(Vec::<u32>::new(), 41, request);
//! assert_eq!(window.page_count(), 3);
//! assert!(!window.is_beyond_last_page());
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised when building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A validated, 1-based page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `page_size >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    page: NonZeroU32,
    page_size: NonZeroU32,
}

impl PageRequest {
    /// Build a request from already validated parts.
    #[must_use]
    pub const fn new(page: NonZeroU32, page_size: NonZeroU32) -> Self {
        Self { page, page_size }
    }

    /// Validate raw values and build a request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero and
    /// [`PageRequestError::ZeroPageSize`] when `page_size` is zero.
    pub const fn try_new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        let Some(valid_page) = NonZeroU32::new(page) else {
            return Err(PageRequestError::ZeroPage);
        };
        let Some(valid_size) = NonZeroU32::new(page_size) else {
            return Err(PageRequestError::ZeroPageSize);
        };
        Ok(Self::new(valid_page, valid_size))
    }

    /// The first page with the given size.
    #[must_use]
    pub const fn first(page_size: NonZeroU32) -> Self {
        Self::new(NonZeroU32::MIN, page_size)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page.get()
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Number of rows to skip: `(page - 1) * page_size`.
    ///
    /// Computed in 64 bits so the product of two `u32` values cannot
    /// overflow.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.page_size.get())
    }

    /// Number of pages needed to show `total` rows. Zero rows need zero
    /// pages.
    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size.get()))
    }

    /// Whether this request starts at or after the last matching row.
    #[must_use]
    pub fn is_beyond(&self, total: u64) -> bool {
        self.offset() >= total
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRequestDto {
    page: u32,
    page_size: u32,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page(),
            page_size: value.page_size(),
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::try_new(value.page, value.page_size)
    }
}

/// One page of rows plus the total number of matches.
///
/// ## Invariants
/// - `items.len() <= request.page_size()` when built through
///   [`PageWindow::new`]; surplus rows are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> PageWindow<T> {
    /// Build a window, truncating `items` to the requested page size.
    #[must_use]
    pub fn new(mut items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let limit = usize::try_from(request.page_size()).unwrap_or(usize::MAX);
        items.truncate(limit);
        Self {
            items,
            total,
            request,
        }
    }

    /// An empty window for a request past the end of the result set.
    #[must_use]
    pub const fn empty(total: u64, request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total,
            request,
        }
    }

    /// Rows on this page, in storage order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the window and return its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total matches ignoring pagination.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The request that produced this window.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Number of pages for the total match count.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.request.page_count(self.total)
    }

    /// Whether the request points past the last page. The first page of
    /// an empty result set is not past the end.
    #[must_use]
    pub fn is_beyond_last_page(&self) -> bool {
        self.request.page() > 1 && self.request.is_beyond(self.total)
    }
}
