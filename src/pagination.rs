//! Page-number pagination over already fetched result sets

use serde::Deserialize;
use utoipa::IntoParams;

/// Number of rows shown per page on list endpoints
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// `?page=N` query string
///
/// Kept as raw text: anything that is not an integer falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, 1-indexed (default: 1)
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page number, `None` when absent or not an integer
    pub fn number(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

/// A bounded slice of a larger ordered result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Current page number, 1-indexed
    pub number: usize,
    /// Total number of pages, at least 1
    pub num_pages: usize,
    /// Total number of rows across all pages
    pub count: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_multiple_pages(&self) -> bool {
        self.num_pages > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Splits ordered rows into fixed-size pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// `per_page` of 0 is treated as 1.
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of pages for `count` rows; an empty set still has one page
    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.per_page).max(1)
    }

    /// Clamp a requested page number into `1..=num_pages`
    pub fn clamp(&self, requested: Option<i64>, count: usize) -> usize {
        let last = self.num_pages(count);
        match requested {
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).map_or(last, |n| n.min(last)),
            None => 1,
        }
    }

    /// Return the requested page of `rows`
    pub fn page<T>(&self, rows: Vec<T>, requested: Option<i64>) -> Page<T> {
        let count = rows.len();
        let number = self.clamp(requested, count);
        let items = rows
            .into_iter()
            .skip((number - 1) * self.per_page)
            .take(self.per_page)
            .collect();

        Page {
            items,
            number,
            num_pages: self.num_pages(count),
            count,
            per_page: self.per_page,
        }
    }
}
