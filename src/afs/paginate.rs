use serde::Serialize;
use std::ops::Range;

/// Where the current page sits in the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based.
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
}

/// Page arithmetic over the visible list. A page size of zero disables
/// paging: everything is on the single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    current: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_enabled(&self) -> bool {
        self.page_size > 0
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        if !self.is_enabled() {
            return 1;
        }
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Keeps the current page inside `1..=total_pages`.
    pub fn clamp(&mut self, total_items: usize) {
        self.current = self.current.clamp(1, self.total_pages(total_items));
    }

    /// Moves to `page`, clamped into range. Returns the page landed on.
    pub fn go_to(&mut self, page: usize, total_items: usize) -> usize {
        self.current = page;
        self.clamp(total_items);
        self.current
    }

    pub fn first(&mut self) {
        self.current = 1;
    }

    /// Index range of the current page within a list of `total_items`.
    pub fn range(&self, total_items: usize) -> Range<usize> {
        if !self.is_enabled() {
            return 0..total_items;
        }
        let start = (self.current - 1).saturating_mul(self.page_size).min(total_items);
        let end = start.saturating_add(self.page_size).min(total_items);
        start..end
    }

    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    pub fn info(&self, total_items: usize) -> PageInfo {
        PageInfo {
            page: self.current,
            total_pages: self.total_pages(total_items),
            page_size: self.page_size,
            total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pages() {
        let pagination = Pagination::new(10);
        assert_eq!(pagination.total_pages(0), 1);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
        assert_eq!(Pagination::new(0).total_pages(500), 1);
    }

    #[test]
    fn slices_current_page() {
        let items: Vec<u32> = (1..=25).collect();
        let mut pagination = Pagination::new(10);
        assert_eq!(pagination.page_of(&items), &items[0..10]);
        pagination.go_to(3, items.len());
        assert_eq!(pagination.page_of(&items), &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let mut pagination = Pagination::new(10);
        assert_eq!(pagination.go_to(9, 25), 3);
        assert_eq!(pagination.go_to(0, 25), 1);

        pagination.go_to(3, 25);
        pagination.clamp(5);
        assert_eq!(pagination.current(), 1);
    }

    #[test]
    fn disabled_paging_shows_everything() {
        let items = [1, 2, 3];
        let mut pagination = Pagination::new(0);
        assert_eq!(pagination.go_to(4, items.len()), 1);
        assert_eq!(pagination.page_of(&items), &items);
    }

    #[test]
    fn info_reports_position() {
        let mut pagination = Pagination::new(4);
        pagination.go_to(2, 9);
        assert_eq!(
            pagination.info(9),
            PageInfo {
                page: 2,
                total_pages: 3,
                page_size: 4,
                total_items: 9
            }
        );
    }
}
