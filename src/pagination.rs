use serde::Serialize;

use crate::domain::query::PaginationState;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Pager shown under the leads table. `None` entries render as an ellipsis.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageLinks {
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl PageLinks {
    pub fn new(pagination: &PaginationState) -> Self {
        let page = pagination.page.max(1);

        Self {
            pages: get_pages(pagination.total_pages, page, 2, 2, 4, 2),
            page,
            total: pagination.total,
            total_pages: pagination.total_pages,
            previous: pagination.has_previous().then(|| page - 1),
            next: pagination.has_next().then(|| page + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(page: usize, total_pages: usize) -> PaginationState {
        PaginationState {
            page,
            limit: 20,
            total: total_pages * 20,
            total_pages,
        }
    }

    #[test]
    fn short_ranges_list_every_page() {
        let links = PageLinks::new(&state(1, 3));

        assert_eq!(links.pages, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(links.previous, None);
        assert_eq!(links.next, Some(2));
    }

    #[test]
    fn long_ranges_collapse_with_ellipses() {
        let links = PageLinks::new(&state(10, 20));

        assert_eq!(
            links.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
        assert_eq!(links.previous, Some(9));
        assert_eq!(links.next, Some(11));
    }

    #[test]
    fn empty_result_has_no_links() {
        let links = PageLinks::new(&state(1, 0));

        assert!(links.pages.is_empty());
        assert_eq!(links.next, None);
    }
}
