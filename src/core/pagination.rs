use thiserror::Error;

pub const PAGE_SIZES: [usize; 5] = [6, 12, 24, 48, 96];
pub const DEFAULT_PAGE_SIZE: usize = 12;
/// 頁碼按鈕的視窗大小
pub const PAGE_WINDOW: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Unsupported page size {0}")]
    InvalidPageSize(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        let mut paginator = Self::default();
        paginator.set_page_size(page_size)?;
        Ok(paginator)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// 變更每頁筆數並回到第一頁
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        if !PAGE_SIZES.contains(&page_size) {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// 跳頁，超出範圍時夾在 [1, total_pages]
    pub fn go_to(&mut self, page: usize, total_items: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages(total_items));
        self.current_page
    }

    pub fn next(&mut self, total_items: usize) -> usize {
        self.go_to(self.current_page + 1, total_items)
    }

    pub fn previous(&mut self, total_items: usize) -> usize {
        self.go_to(self.current_page.saturating_sub(1), total_items)
    }

    /// 資料筆數變少時，目前頁碼可能超出範圍
    pub fn effective_page(&self, total_items: usize) -> usize {
        self.current_page.clamp(1, self.total_pages(total_items))
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.effective_page(items.len());
        let start = ((page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// 以目前頁為中心的最多 5 個頁碼，靠邊時往內平移
    pub fn page_window(&self, total_items: usize) -> Vec<usize> {
        let total = self.total_pages(total_items);
        let current = self.effective_page(total_items);
        let width = PAGE_WINDOW.min(total);

        let half = PAGE_WINDOW / 2;
        let start = current.saturating_sub(half).max(1).min(total - width + 1);
        (start..start + width).collect()
    }

    /// 「顯示第 x–y 筆，共 n 筆」用的範圍（從 1 起算）
    pub fn item_range(&self, total_items: usize) -> Option<(usize, usize)> {
        if total_items == 0 {
            return None;
        }
        let page = self.effective_page(total_items);
        let first = (page - 1) * self.page_size + 1;
        let last = (page * self.page_size).min(total_items);
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsupported_page_size() {
        assert_eq!(Paginator::new(10), Err(PaginationError::InvalidPageSize(10)));
        assert!(Paginator::new(48).is_ok());
    }

    #[test]
    fn test_total_pages_never_zero() {
        let paginator = Paginator::default();
        assert_eq!(paginator.total_pages(0), 1);
        assert_eq!(paginator.total_pages(12), 1);
        assert_eq!(paginator.total_pages(13), 2);
    }

    #[test]
    fn test_pages_cover_items_exactly_once() {
        for total in [0usize, 1, 5, 6, 7, 47, 48, 49, 100, 193] {
            let items: Vec<usize> = (0..total).collect();
            for size in PAGE_SIZES {
                let mut paginator = Paginator::new(size).unwrap();
                let mut seen = Vec::new();
                for page in 1..=paginator.total_pages(total) {
                    paginator.go_to(page, total);
                    let slice = paginator.slice(&items);
                    assert!(slice.len() <= size);
                    seen.extend_from_slice(slice);
                }
                assert_eq!(seen, items, "total={} size={}", total, size);
            }
        }
    }

    #[test]
    fn test_go_to_clamps() {
        let mut paginator = Paginator::new(6).unwrap();
        assert_eq!(paginator.go_to(99, 20), 4);
        assert_eq!(paginator.go_to(0, 20), 1);
        assert_eq!(paginator.previous(20), 1);
        assert_eq!(paginator.next(20), 2);
    }

    #[test]
    fn test_page_window_slides() {
        let mut paginator = Paginator::new(6).unwrap();
        let total = 6 * 10;

        assert_eq!(paginator.page_window(total), vec![1, 2, 3, 4, 5]);
        paginator.go_to(2, total);
        assert_eq!(paginator.page_window(total), vec![1, 2, 3, 4, 5]);
        paginator.go_to(6, total);
        assert_eq!(paginator.page_window(total), vec![4, 5, 6, 7, 8]);
        paginator.go_to(10, total);
        assert_eq!(paginator.page_window(total), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_page_window_with_few_pages() {
        let mut paginator = Paginator::new(6).unwrap();
        paginator.go_to(2, 14);
        assert_eq!(paginator.page_window(14), vec![1, 2, 3]);
        assert_eq!(paginator.page_window(0), vec![1]);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut paginator = Paginator::default();
        paginator.go_to(3, 100);
        paginator.set_page_size(24).unwrap();
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn test_slice_after_items_shrink() {
        let mut paginator = Paginator::new(6).unwrap();
        let items: Vec<u32> = (0..30).collect();
        paginator.go_to(5, items.len());
        let fewer = &items[..8];
        assert_eq!(paginator.slice(fewer), &items[6..8]);
        assert_eq!(paginator.item_range(fewer.len()), Some((7, 8)));
        assert_eq!(paginator.item_range(0), None);
    }
}
