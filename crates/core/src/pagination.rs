//! Pagination contracts shared by every listing query.
//!
//! Two rules hold everywhere, and they are asymmetric on purpose:
//!
//! - an empty result set is not an error: the envelope comes back with no
//!   items, zero total pages, and `current_page` reported as 0;
//! - a page beyond the last one, when there *are* items, is a NotFound --
//!   callers never silently receive an empty tail page.
//!
//! The total must be counted with the exact same predicate as the page
//! query, before LIMIT/OFFSET, so `total_pages` always agrees with the
//! returned page.

use serde::Serialize;

use crate::error::CoreError;

/// Page size applied when the caller does not send `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Ceiling for caller-supplied `limit`. Requests above this are rejected,
/// not clamped.
pub const MAX_PAGE_SIZE: i64 = 50;

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A validated page/limit pair.
///
/// Construction is the only validation point: a `PageRequest` in hand is
/// always in range, so repositories can compute offsets without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    /// Validate a page/limit pair against the global [`MAX_PAGE_SIZE`].
    pub fn new(page: i64, limit: i64) -> Result<Self, CoreError> {
        Self::with_max(page, limit, MAX_PAGE_SIZE)
    }

    /// Validate against an explicit ceiling (configuration override).
    pub fn with_max(page: i64, limit: i64, max_limit: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if limit < 1 {
            return Err(CoreError::Validation(format!(
                "limit must be >= 1, got {limit}"
            )));
        }
        if limit > max_limit {
            return Err(CoreError::Validation(format!(
                "limit must be <= {max_limit}, got {limit}"
            )));
        }
        Ok(Self { page, limit })
    }

    /// Apply defaults for absent query parameters, then validate.
    pub fn from_optional(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        Self::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Row offset of this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Resolve this request against a counted total.
    ///
    /// Returns [`PageWindow::Empty`] when the total is zero, an error when
    /// the requested page lies beyond the last page, and the concrete
    /// LIMIT/OFFSET window otherwise.
    pub fn resolve(&self, total_items: i64) -> Result<PageWindow, CoreError> {
        if total_items == 0 {
            return Ok(PageWindow::Empty);
        }
        let total_pages = total_pages(total_items, self.limit);
        if self.page > total_pages {
            return Err(CoreError::not_found_key(
                "page",
                format!("{} of {total_pages}", self.page),
            ));
        }
        Ok(PageWindow::Window {
            offset: self.offset(),
            limit: self.limit,
            total_pages,
        })
    }
}

/// Outcome of [`PageRequest::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWindow {
    /// Zero matching rows: produce an empty envelope, run no page query.
    Empty,
    /// Fetch `limit` rows at `offset`; the envelope reports `total_pages`.
    Window {
        offset: i64,
        limit: i64,
        total_pages: i64,
    },
}

/// `ceil(total_items / limit)`.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    (total_items + limit - 1) / limit
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The pagination envelope returned by every listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    /// 1-based; 0 when the result set is empty.
    pub current_page: i64,
}

impl<T> Page<T> {
    /// The empty envelope (`total_items == 0` contract).
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            current_page: 0,
        }
    }

    /// Build an envelope from fetched items and the resolved window.
    pub fn from_window(items: Vec<T>, total_items: i64, total_pages: i64, page: i64) -> Self {
        Self {
            items,
            total_items,
            total_pages,
            current_page: page,
        }
    }

    /// Map the item type, keeping the counts.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn rejects_page_below_one() {
        assert!(matches!(
            PageRequest::new(0, 10),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn rejects_limit_below_one() {
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn rejects_limit_above_ceiling() {
        assert!(matches!(
            PageRequest::new(1, MAX_PAGE_SIZE + 1),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn defaults_apply_when_params_absent() {
        let req = PageRequest::from_optional(None, None).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn offset_is_zero_based() {
        let req = PageRequest::new(3, 10).unwrap();
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }

    #[test]
    fn zero_total_resolves_to_empty_without_error() {
        let req = PageRequest::new(5, 10).unwrap();
        assert_eq!(req.resolve(0).unwrap(), PageWindow::Empty);
    }

    #[test]
    fn page_beyond_last_is_not_found() {
        let req = PageRequest::new(3, 10).unwrap();
        assert!(matches!(
            req.resolve(15),
            Err(CoreError::NotFound { entity: "page", .. })
        ));
    }

    #[test]
    fn last_page_resolves() {
        let req = PageRequest::new(2, 10).unwrap();
        assert_eq!(
            req.resolve(15).unwrap(),
            PageWindow::Window {
                offset: 10,
                limit: 10,
                total_pages: 2
            }
        );
    }

    #[test]
    fn empty_envelope_reports_page_zero() {
        let page: Page<i64> = Page::empty();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 0);
    }
}
