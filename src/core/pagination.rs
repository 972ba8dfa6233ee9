//! Pagination of filtered lists
//!
//! Pages are 0-based, matching the table pagination controls. Slicing is
//! clamped, so an out-of-range page is simply empty.

use serde::Serialize;

/// Rows per page offered by the table footer
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Return the slice shown on `page`. A `rows_per_page` of 0 is treated as 1.
pub fn paginate<T>(items: &[T], page: usize, rows_per_page: usize) -> &[T] {
    let (start, end) = bounds(items.len(), page, rows_per_page);
    &items[start..end]
}

/// Number of blank rows that keep the table height constant on the last page
pub fn empty_rows(page: usize, rows_per_page: usize, total: usize) -> usize {
    let remaining = total.saturating_sub(page.saturating_mul(rows_per_page));
    rows_per_page.saturating_sub(remaining)
}

fn bounds(len: usize, page: usize, rows_per_page: usize) -> (usize, usize) {
    let rows_per_page = rows_per_page.max(1);
    let start = page.saturating_mul(rows_per_page).min(len);
    let end = start.saturating_add(rows_per_page).min(len);
    (start, end)
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 0)
    pub page: usize,

    /// Number of items per page
    pub rows_per_page: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, rows_per_page: usize, total: usize) -> Self {
        // Ensure rows_per_page is at least 1 to avoid division by zero
        let rows_per_page = rows_per_page.max(1);
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(rows_per_page)
        };
        let start = page.saturating_mul(rows_per_page);

        Self {
            page,
            rows_per_page,
            total,
            total_pages,
            has_next: start.saturating_add(rows_per_page) < total,
            has_prev: page > 0,
        }
    }

    /// Last valid page index, used to clamp after filters shrink the list
    pub fn last_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }
}

/// One page of a filtered list, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
    pub empty_rows: usize,
}

/// Slice an owned list into one page
pub fn paginate_owned<T>(items: Vec<T>, page: usize, rows_per_page: usize) -> Page<T> {
    let rows_per_page = rows_per_page.max(1);
    let total = items.len();
    let (start, end) = bounds(total, page, rows_per_page);
    let items = items.into_iter().skip(start).take(end - start).collect();

    Page {
        items,
        meta: PaginationMeta::new(page, rows_per_page, total),
        empty_rows: empty_rows(page, rows_per_page, total),
    }
}
