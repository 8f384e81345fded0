//! Page slicing and pagination metadata (made by FontLab https://www.fontlab.com/)

use serde::{Deserialize, Serialize};

use crate::catalog::FontRecord;

/// One page of results plus the numbers a client needs to navigate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPage<T = FontRecord> {
    pub fonts: Vec<T>,
    pub total: usize,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Slice `fonts` into the 1-based `page` of size `limit`.
///
/// `limit` below 1 is clamped to 1. A page at or below 0 yields an empty
/// slice but is echoed back unchanged; so is a page past the end.
pub fn paginate_fonts<T: Clone>(fonts: &[T], page: i64, limit: i64) -> FontPage<T> {
    let limit = limit.max(1);
    let total = fonts.len();
    let total_i64 = i64::try_from(total).unwrap_or(i64::MAX);
    let total_pages = total_i64 / limit + i64::from(total_i64 % limit != 0);

    let start = page.saturating_sub(1).saturating_mul(limit);
    let end = start.saturating_add(limit);
    let start = start.clamp(0, total_i64);
    let end = end.clamp(start, total_i64);

    // Both bounds are within 0..=total here.
    let slice = &fonts[start as usize..end as usize];

    FontPage {
        fonts: slice.to_vec(),
        total,
        page,
        limit,
        total_pages,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}
