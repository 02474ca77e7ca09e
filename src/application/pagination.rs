//! Page-number pagination over filtered collections.

use std::num::IntErrorKind;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be an integer greater than or equal to 1, got `{0}`")]
    InvalidPage(String),
    #[error("pageSize must be an integer between 1 and {MAX_PAGE_SIZE}, got `{0}`")]
    InvalidPageSize(String),
    #[error("page {page} is beyond the last page ({total_pages})")]
    PageOutOfRange { page: u64, total_pages: usize },
}

/// Validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, page_size: u32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage(page.to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(PaginationError::InvalidPageSize(page_size.to_string()));
        }
        Ok(Self { page, page_size })
    }

    /// Parse raw query values; absent values fall back to the defaults.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self, PaginationError> {
        let page = match page {
            Some(raw) => parse_page(raw)
                .filter(|value| *value >= 1)
                .ok_or_else(|| PaginationError::InvalidPage(raw.to_string()))?,
            None => DEFAULT_PAGE,
        };

        let page_size = match page_size {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| (1..=MAX_PAGE_SIZE).contains(value))
                .ok_or_else(|| PaginationError::InvalidPageSize(raw.to_string()))?,
            None => DEFAULT_PAGE_SIZE,
        };

        Self::new(page, page_size)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn bounds(&self, total: usize) -> (usize, usize) {
        let size = self.page_size as usize;
        let page = usize::try_from(self.page).unwrap_or(usize::MAX);
        let start = (page - 1).saturating_mul(size).min(total);
        let end = page.saturating_mul(size).min(total);
        (start, end)
    }
}

/// Decimal page number. Values too large for `u64` saturate, so they read as
/// a page beyond the last one rather than as malformed input.
fn parse_page(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// One page of a filtered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u64,
    pub total_pages: usize,
    pub count: usize,
    pub list: Vec<T>,
}

/// Slice `items` for `request`.
///
/// An empty slice is only an error when there was something to page through;
/// an empty input yields an empty first page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Result<Page<T>, PaginationError> {
    let count = items.len();
    let total_pages = count.div_ceil(request.page_size as usize);
    let (start, end) = request.bounds(count);

    if start == end && count > 0 {
        return Err(PaginationError::PageOutOfRange {
            page: request.page,
            total_pages,
        });
    }

    let list = items.into_iter().skip(start).take(end - start).collect();

    Ok(Page {
        page: request.page,
        total_pages,
        count,
        list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let request = PageRequest::parse(None, None).expect("defaults");
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 20);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for page in ["0", "-1", "abc", "1.5", ""] {
            assert_eq!(
                PageRequest::parse(Some(page), None),
                Err(PaginationError::InvalidPage(page.to_string()))
            );
        }
        for size in ["0", "101", "-5", "twenty", ""] {
            assert_eq!(
                PageRequest::parse(None, Some(size)),
                Err(PaginationError::InvalidPageSize(size.to_string()))
            );
        }
        assert!(PageRequest::parse(Some("3"), Some("100")).is_ok());
    }

    #[test]
    fn oversized_page_numbers_are_out_of_range() {
        for (raw, page) in [
            ("99999999999", 99_999_999_999),
            ("99999999999999999999999", u64::MAX),
        ] {
            let request = PageRequest::parse(Some(raw), None).expect("well-formed page");
            assert_eq!(request.page(), page);
            assert_eq!(
                paginate(vec![1, 2, 3], request),
                Err(PaginationError::PageOutOfRange {
                    page,
                    total_pages: 1
                })
            );
        }
    }

    #[test]
    fn pages_partition_the_input() {
        let items: Vec<u32> = (1..=45).collect();
        let first = paginate(items.clone(), PageRequest::new(1, 20).expect("valid"))
            .expect("first page");
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.count, 45);

        let mut collected = Vec::new();
        for page in 1..=first.total_pages as u64 {
            let slice = paginate(items.clone(), PageRequest::new(page, 20).expect("valid"))
                .expect("page in range");
            assert!(slice.list.len() <= 20);
            collected.extend(slice.list);
        }
        assert_eq!(collected, items);
    }

    #[test]
    fn page_beyond_range_is_distinct_from_empty_input() {
        let err = paginate(vec![1, 2, 3], PageRequest::new(2, 3).expect("valid"))
            .expect_err("out of range");
        assert_eq!(
            err,
            PaginationError::PageOutOfRange {
                page: 2,
                total_pages: 1
            }
        );

        let empty = paginate(Vec::<u32>::new(), PageRequest::default()).expect("empty page");
        assert_eq!(empty.total_pages, 0);
        assert!(empty.list.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let page = paginate(vec!["a"], PageRequest::default()).expect("page");
        let value = serde_json::to_value(&page).expect("serializable");
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["count"], 1);
        assert_eq!(value["list"][0], "a");
    }
}
