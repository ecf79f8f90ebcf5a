//! Listing / pagination adapter
//!
//! Slices an ordered result set into fixed-size pages. Page numbers are
//! 0-based; a number past either end is clamped to the nearest page rather
//! than rejected.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page size used when the caller does not pass one
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Upper bound for any requested page size
pub const MAX_PAGE_SIZE: usize = 1000;

/// Clamp a caller-supplied page size into `[1, MAX_PAGE_SIZE]`
pub fn clamp_page_size(requested: i64) -> usize {
    requested.clamp(1, MAX_PAGE_SIZE as i64) as usize
}

/// Page metadata reported alongside every listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub page_size: usize,
}

/// One page of items plus its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Compute the slice bounds and metadata for a page without touching items.
///
/// `total_pages` is at least 1, so an empty set still has page 0.
fn page_bounds(total_items: usize, page_number: i64, page_size: usize) -> (Range<usize>, PageInfo) {
    let page_size = page_size.max(1);
    let total_pages = total_items.div_ceil(page_size).max(1);
    let last_page = total_pages - 1;

    let current_page = if page_number < 0 {
        0
    } else {
        usize::try_from(page_number).map_or(last_page, |n| n.min(last_page))
    };

    let start = (current_page * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    let info = PageInfo {
        current_page,
        total_pages,
        total_items,
        has_next: current_page < last_page,
        has_previous: current_page > 0,
        page_size,
    };

    (start..end, info)
}

/// Slice `items` down to the requested page
pub fn paginate<T>(items: Vec<T>, page_number: i64, page_size: usize) -> Page<T> {
    let (range, info) = page_bounds(items.len(), page_number, page_size);
    let items = items
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();
    Page { items, info }
}
