//! Page requests and page envelopes.
//!
//! # Responsibility
//! - Validate caller-supplied page index/size once, at construction.
//! - Carry page metadata unchanged through record mapping.
//!
//! # Invariants
//! - `size >= 1` for every constructed `PageRequest`.
//! - Results are always ordered with `id ASC` as the final tie-breaker.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected page request parameters. Values are never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPageRequest {
    NegativePage(i64),
    NonPositiveSize(i64),
    /// Index or size does not fit the supported range.
    OutOfRange { page: i64, size: i64 },
}

impl Display for InvalidPageRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativePage(page) => write!(f, "page index must not be negative, got {page}"),
            Self::NonPositiveSize(size) => write!(f, "page size must be at least 1, got {size}"),
            Self::OutOfRange { page, size } => {
                write!(f, "page request out of range: page={page} size={size}")
            }
        }
    }
}

impl Error for InvalidPageRequest {}

/// Client column usable as sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    BirthDate,
    Income,
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Caller-selected ordering. `id ASC` is always appended as tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Validated page window over a filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Option<Sort>,
}

impl PageRequest {
    /// Builds a request for zero-based `page` holding at most `size` records.
    ///
    /// # Errors
    /// - `NegativePage` when `page < 0`.
    /// - `NonPositiveSize` when `size <= 0`.
    /// - `OutOfRange` when either value exceeds `u32`.
    pub fn of(page: i64, size: i64) -> Result<Self, InvalidPageRequest> {
        if page < 0 {
            return Err(InvalidPageRequest::NegativePage(page));
        }
        if size <= 0 {
            return Err(InvalidPageRequest::NonPositiveSize(size));
        }
        let (Ok(page_u32), Ok(size_u32)) = (u32::try_from(page), u32::try_from(size)) else {
            return Err(InvalidPageRequest::OutOfRange { page, size });
        };
        Ok(Self {
            page: page_u32,
            size: size_u32,
            sort: None,
        })
    }

    /// Same as [`PageRequest::of`] with an explicit ordering.
    pub fn sorted(page: i64, size: i64, sort: Sort) -> Result<Self, InvalidPageRequest> {
        Ok(Self::of(page, size)?.with_sort(sort))
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Number of matching records skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One window of results plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    total_elements: u64,
    page: u32,
    size: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
            page: request.page(),
            size: request.size(),
        }
    }

    /// Records in this window.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Matches across all pages.
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Converts every record, keeping page metadata untouched.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidPageRequest, Page, PageRequest};

    #[test]
    fn of_rejects_negative_page_and_non_positive_size() {
        assert_eq!(
            PageRequest::of(-1, 10),
            Err(InvalidPageRequest::NegativePage(-1))
        );
        assert_eq!(
            PageRequest::of(0, 0),
            Err(InvalidPageRequest::NonPositiveSize(0))
        );
        assert_eq!(
            PageRequest::of(0, -5),
            Err(InvalidPageRequest::NonPositiveSize(-5))
        );
        assert!(matches!(
            PageRequest::of(i64::from(u32::MAX) + 1, 10),
            Err(InvalidPageRequest::OutOfRange { .. })
        ));
    }

    #[test]
    fn offset_is_page_times_size() {
        let request = PageRequest::of(3, 6).unwrap();
        assert_eq!(request.offset(), 18);
    }

    #[test]
    fn page_metadata_reports_navigation() {
        let request = PageRequest::of(0, 5).unwrap();
        let first = Page::new(vec![1, 2, 3, 4, 5], &request, 12);
        assert_eq!(first.total_pages(), 3);
        assert!(first.has_next());
        assert!(first.is_first());
        assert!(!first.is_last());

        let request = PageRequest::of(2, 5).unwrap();
        let last = Page::new(vec![11, 12], &request, 12);
        assert!(!last.has_next());
        assert!(last.has_previous());
        assert!(last.is_last());
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_total() {
        let request = PageRequest::of(9, 5).unwrap();
        let page: Page<i32> = Page::new(Vec::new(), &request, 12);
        assert!(page.is_empty());
        assert_eq!(page.total_elements(), 12);
        assert!(!page.has_next());
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let request = PageRequest::of(0, 10).unwrap();
        let page: Page<i32> = Page::new(Vec::new(), &request, 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn map_preserves_metadata() {
        let request = PageRequest::of(1, 2).unwrap();
        let page = Page::new(vec![3, 4], &request, 7).map(|value| value * 10);
        assert_eq!(page.content(), &[30, 40]);
        assert_eq!(page.total_elements(), 7);
        assert_eq!(page.page(), 1);
        assert_eq!(page.size(), 2);
    }
}
