//! Page slicing over fully ranked result lists

use serde::{Deserialize, Serialize};

/// One page of an ordered result list, with enough counts for a pager UI.
///
/// `items` is always a contiguous slice of the fully ranked list - ranking
/// must have run over the entire candidate set before slicing, never over a
/// single page's worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number as requested
    pub page: u32,
    pub page_size: u32,
    /// Total candidates across all pages
    pub total: u64,
    pub total_pages: u32,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            page_size,
            total: 0,
            total_pages: 0,
            has_more: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Slices `[(page-1)*page_size, page*page_size)` out of the ranked list,
/// clamped to the list bounds. An out-of-range page yields empty items with
/// `has_more = false`. `page` and `page_size` must already be clamped >= 1.
pub fn paginate<T>(ranked: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let total = ranked.len() as u64;
    let total_pages = total.div_ceil(page_size as u64) as u32;

    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let items: Vec<T> = ranked
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
        has_more: page < total_pages,
    }
}
