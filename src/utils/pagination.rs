use crate::models::page::Page;

/// 分页窗口：解析后的页码与 SQL 偏移量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: i64,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: (per_page as i64).max(1),
        }
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// 总页数；没有记录时仍有一个空的第一页
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }

    /// 未指定页码取第一页；越界（小于 1 或超过末页）取最后一页
    pub fn window(&self, requested: Option<i64>, total: i64) -> PageWindow {
        let total_pages = self.total_pages(total);
        let page = match requested {
            None => 1,
            Some(n) if n < 1 || n > total_pages => total_pages,
            Some(n) => n,
        };

        PageWindow {
            page,
            total_pages,
            limit: self.per_page,
            offset: (page - 1) * self.per_page,
        }
    }

    pub fn page<T>(&self, window: PageWindow, total: i64, data: Vec<T>) -> Page<T> {
        Page {
            data,
            total: total.max(0),
            page: window.page,
            per_page: self.per_page,
            total_pages: window.total_pages,
            has_next: window.page < window.total_pages,
            has_prev: window.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fifteen_posts_two_pages() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.total_pages(15), 2);

        let first = paginator.window(Some(1), 15);
        assert_eq!((first.page, first.offset, first.limit), (1, 0, 10));

        let second = paginator.window(Some(2), 15);
        assert_eq!((second.page, second.offset), (2, 10));
    }

    #[test]
    fn test_out_of_range_clamps_to_last_page() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.window(Some(99), 15).page, 2);
        assert_eq!(paginator.window(Some(0), 15).page, 2);
        assert_eq!(paginator.window(Some(-3), 15).page, 2);
        assert_eq!(paginator.window(None, 15).page, 1);
        assert_eq!(paginator.window(Some(i64::MAX), 15).page, 2);
        assert_eq!(paginator.window(Some(i64::MIN), 15).page, 2);
    }

    #[test]
    fn test_empty_collection() {
        let paginator = Paginator::new(10);
        let window = paginator.window(Some(5), 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);

        let page: Page<i32> = paginator.page(window, 0, Vec::new());
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_zero_page_size_is_coerced() {
        assert_eq!(Paginator::new(0).per_page(), 1);
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 1i64..10_000, per_page in 1usize..200) {
            let paginator = Paginator::new(per_page);
            let per = per_page as i64;
            let pages = paginator.total_pages(total);
            prop_assert!(pages * per >= total);
            prop_assert!((pages - 1) * per < total);
        }

        #[test]
        fn prop_window_is_always_in_range(
            total in 0i64..10_000,
            per_page in 1usize..200,
            requested in proptest::option::of(-50i64..500),
        ) {
            let paginator = Paginator::new(per_page);
            let window = paginator.window(requested, total);
            prop_assert!(window.page >= 1);
            prop_assert!(window.page <= window.total_pages);
            prop_assert!(window.offset <= total.max(0));
        }
    }
}
