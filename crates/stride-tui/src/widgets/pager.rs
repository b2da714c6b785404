//! Pagination math and footer rendering shared by the list screens.

use stride_core::PageQuery;

/// Total page count for a given record count and page size.
/// An empty collection still has one (empty) page.
pub fn total_pages(total_items: u64, size: u32) -> u32 {
    if size == 0 {
        return 1;
    }
    let pages = total_items.div_ceil(u64::from(size));
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

/// Query for the next page, clamped to the last page.
pub fn next_page(query: &PageQuery, total_items: u64) -> PageQuery {
    let last = total_pages(total_items, query.size).saturating_sub(1);
    PageQuery {
        page: query.page.saturating_add(1).min(last),
        ..query.clone()
    }
}

/// Query for the previous page, clamped to the first.
pub fn prev_page(query: &PageQuery) -> PageQuery {
    PageQuery {
        page: query.page.saturating_sub(1),
        ..query.clone()
    }
}

/// Footer text, e.g. "page 2/4 · 73 total".
pub fn page_line(query: &PageQuery, total_items: u64) -> String {
    format!(
        "page {}/{} · {} total",
        query.page + 1,
        total_pages(total_items, query.size),
        total_items
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn query(page: u32, size: u32) -> PageQuery {
        PageQuery {
            page,
            size,
            sort: None,
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(73, 20), 4);
        assert_eq!(total_pages(5, 0), 1);
    }

    #[test]
    fn next_page_clamps_to_last() {
        assert_eq!(next_page(&query(0, 20), 73).page, 1);
        assert_eq!(next_page(&query(3, 20), 73).page, 3);
        assert_eq!(next_page(&query(0, 20), 0).page, 0);
    }

    #[test]
    fn prev_page_clamps_to_first() {
        assert_eq!(prev_page(&query(2, 20)).page, 1);
        assert_eq!(prev_page(&query(0, 20)).page, 0);
    }

    #[test]
    fn page_line_is_one_based() {
        assert_eq!(page_line(&query(0, 20), 73), "page 1/4 · 73 total");
        assert_eq!(page_line(&query(3, 20), 73), "page 4/4 · 73 total");
    }
}
