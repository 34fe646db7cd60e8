//! Read-only paging over lists the backend returns in full.

use serde::Serialize;

const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// `page` is 1-based and clamped to at least 1; pages past the end are empty.
    pub fn paginate(all: &[T], page: usize, per_page: usize) -> Self {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let page = page.max(1);
        let total = all.len();
        let total_pages = total.div_ceil(per_page);

        let start = (page - 1).saturating_mul(per_page).min(total);
        let end = start.saturating_add(per_page).min(total);

        Self {
            items: all[start..end].to_vec(),
            total,
            page,
            per_page,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
