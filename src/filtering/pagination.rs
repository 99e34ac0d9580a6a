use hyper::HeaderMap;
use serde::Serialize;

use crate::models::FilterOptions;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
/// Upper bound on `per_page` and on the width of a `range` request
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Page cursor over an ordered result set.
///
/// Only the requested page and page size are stored; everything else is
/// derived from the current total by [`Pagination::window`], so a shrinking
/// result set can never leave the cursor on a page that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    items_per_page: usize,
}

/// Derived slice boundaries for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// 1-based, clamped to `[1, total_pages]` (1 when there are no pages)
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// Inclusive start index into the full result set
    pub start_index: usize,
    /// Exclusive end index into the full result set
    pub end_index: usize,
}

impl PageWindow {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of results together with its window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub window: PageWindow,
}

/// `ceil(total / per_page)`; `per_page` is never zero here.
fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page)
}

fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages).max(1)
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Pagination {
    /// A cursor on page 1. A page size of zero is raised to one.
    #[must_use]
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Start on `page` instead of 1. Clamped lazily against the total.
    #[must_use]
    pub fn starting_at(mut self, page: usize) -> Self {
        self.current_page = page.max(1);
        self
    }

    #[must_use]
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// The page as requested, before clamping against any total.
    #[must_use]
    pub fn requested_page(&self) -> usize {
        self.current_page
    }

    /// Derive the window for a result set of `total` items.
    #[must_use]
    pub fn window(&self, total: usize) -> PageWindow {
        let total_pages = total_pages(total, self.items_per_page);
        let current_page = clamp_page(self.current_page, total_pages);
        let start_index = ((current_page - 1) * self.items_per_page).min(total);
        let end_index = (start_index + self.items_per_page).min(total);

        PageWindow {
            current_page,
            items_per_page: self.items_per_page,
            total_pages,
            total_count: total,
            start_index,
            end_index,
        }
    }

    /// Borrow the current page out of `items`.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let window = self.window(items.len());
        &items[window.start_index..window.end_index]
    }

    /// Copy the current page out of `items` along with its window.
    #[must_use]
    pub fn page<T: Clone>(&self, items: &[T]) -> Page<T> {
        let window = self.window(items.len());
        Page {
            items: items[window.start_index..window.end_index].to_vec(),
            window,
        }
    }

    /// Jump to `page`, clamped into `[1, total_pages]` for `total` items.
    pub fn go_to_page(&mut self, page: usize, total: usize) {
        let clamped = clamp_page(page, total_pages(total, self.items_per_page));
        if clamped != page {
            tracing::debug!(requested = page, clamped, "Clamped page request");
        }
        self.current_page = clamped;
    }

    pub fn next_page(&mut self, total: usize) {
        let current = self.window(total).current_page;
        self.go_to_page(current + 1, total);
    }

    pub fn previous_page(&mut self, total: usize) {
        let current = self.window(total).current_page;
        self.go_to_page(current.saturating_sub(1), total);
    }

    /// Change the page size. Always returns to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    pub fn reset_to_first_page(&mut self) {
        self.current_page = 1;
    }
}

/// Parse a React-Admin style `[start, end]` range, defaulting to `(0, 9)`.
#[must_use]
pub fn parse_range(range_str: Option<&str>) -> (u64, u64) {
    range_str.map_or((0, 9), |r| {
        serde_json::from_str::<[u64; 2]>(r)
            .map(|range| (range[0], range[1]))
            .unwrap_or((0, 9))
    })
}

/// Resolve REST pagination parameters into `(offset, limit)`.
///
/// `page`/`per_page` (1-based) wins over `range`; with neither the first
/// ten items are returned. Limits are capped at [`MAX_PAGE_SIZE`].
#[must_use]
pub fn parse_pagination(params: &FilterOptions) -> (u64, u64) {
    if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        (offset, per_page)
    } else if let Some(range) = &params.range {
        let (start, end) = parse_range(Some(range));
        let limit = end.saturating_sub(start).saturating_add(1).min(MAX_PAGE_SIZE);
        (start, limit)
    } else {
        (0, DEFAULT_ITEMS_PER_PAGE as u64)
    }
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// Build the `Content-Range` header for a list response.
///
/// The end index is inclusive. When the window holds no items the range is
/// written as `*`, e.g. `patients */0`.
///
/// # Arguments
///
/// * `offset` - The starting point of the range.
/// * `limit` - The maximum number of items to include in the range.
/// * `total_count` - The total number of items available.
/// * `resource_name` - The name of the resource being paginated.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let end = offset.saturating_add(limit).min(total_count);
    let range = if end > offset {
        format!("{offset}-{}", end - 1)
    } else {
        "*".to_string()
    };

    let safe_name = sanitize_resource_name(resource_name);
    let content_range = format!("{safe_name} {range}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    } else if let Ok(value) = format!("items {range}/{total_count}").parse() {
        headers.insert("Content-Range", value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_three_items_five_per_page() {
        let items: Vec<u32> = (1..=23).collect();
        let mut pagination = Pagination::new(5);
        assert_eq!(pagination.window(items.len()).total_pages, 5);

        pagination.go_to_page(9, items.len());
        let window = pagination.window(items.len());
        assert_eq!(window.current_page, 5);
        assert_eq!(pagination.slice(&items), &[21, 22, 23]);
    }

    #[test]
    fn test_slices_cover_everything_once() {
        for total in [0_usize, 1, 4, 5, 6, 23, 100] {
            for per_page in [1_usize, 3, 5, 10, 50] {
                let items: Vec<usize> = (0..total).collect();
                let mut pagination = Pagination::new(per_page);
                let pages = pagination.window(total).total_pages;
                let mut seen = Vec::new();
                for page in 1..=pages {
                    pagination.go_to_page(page, total);
                    let slice = pagination.slice(&items);
                    assert!(slice.len() <= per_page);
                    seen.extend_from_slice(slice);
                }
                assert_eq!(seen, items, "total={total} per_page={per_page}");
            }
        }
    }

    #[test]
    fn test_empty_result_set() {
        let pagination = Pagination::new(10).starting_at(4);
        let window = pagination.window(0);
        assert_eq!(window.total_pages, 0);
        assert_eq!(window.current_page, 1);
        assert_eq!((window.start_index, window.end_index), (0, 0));
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn test_go_to_page_zero_clamps_to_one() {
        let mut pagination = Pagination::new(5);
        pagination.go_to_page(0, 23);
        assert_eq!(pagination.window(23).current_page, 1);
    }

    #[test]
    fn test_next_and_previous_stop_at_bounds() {
        let mut pagination = Pagination::new(10);
        pagination.previous_page(25);
        assert_eq!(pagination.window(25).current_page, 1);
        pagination.next_page(25);
        pagination.next_page(25);
        pagination.next_page(25);
        assert_eq!(pagination.window(25).current_page, 3);
        pagination.previous_page(25);
        assert_eq!(pagination.window(25).current_page, 2);
    }

    #[test]
    fn test_set_items_per_page_resets_page() {
        let mut pagination = Pagination::new(5);
        pagination.go_to_page(4, 23);
        pagination.set_items_per_page(10);
        assert_eq!(pagination.requested_page(), 1);
        assert_eq!(pagination.window(23).total_pages, 3);
    }

    #[test]
    fn test_zero_page_size_is_raised() {
        let mut pagination = Pagination::new(0);
        assert_eq!(pagination.items_per_page(), 1);
        pagination.set_items_per_page(0);
        assert_eq!(pagination.items_per_page(), 1);
    }

    #[test]
    fn test_window_clamps_when_total_shrinks() {
        let mut pagination = Pagination::new(5);
        pagination.go_to_page(5, 23);
        // Result set shrank to 7 items after a filter change
        let window = pagination.window(7);
        assert_eq!(window.current_page, 2);
        assert_eq!((window.start_index, window.end_index), (5, 7));
    }

    #[test]
    fn test_page_serializes_flat() {
        let page = Pagination::new(2).page(&["a", "b", "c"]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!(["a", "b"]));
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["currentPage"], 1);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(Some("[10,19]")), (10, 19));
        assert_eq!(parse_range(Some("garbage")), (0, 9));
        assert_eq!(parse_range(None), (0, 9));
    }

    #[test]
    fn test_parse_pagination_prefers_page_params() {
        let params = FilterOptions {
            page: Some(3),
            per_page: Some(5),
            range: Some("[0,99]".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (10, 5));

        let params = FilterOptions {
            range: Some("[20,29]".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (20, 10));

        assert_eq!(parse_pagination(&FilterOptions::default()), (0, 10));
    }

    #[test]
    fn test_content_range_normal() {
        let headers = calculate_content_range(0, 10, 100, "patients");
        let value = headers.get("Content-Range").unwrap().to_str().unwrap();
        assert_eq!(value, "patients 0-9/100");
    }

    #[test]
    fn test_content_range_handles_special_chars_gracefully() {
        let headers = calculate_content_range(0, 10, 100, "patients\r\nInjected: evil");
        let value = headers.get("Content-Range").unwrap().to_str().unwrap();
        assert!(!value.contains('\r'));
        assert!(!value.contains('\n'));
    }

    #[test]
    fn test_content_range_large_numbers() {
        let headers = calculate_content_range(u64::MAX - 5, 10, u64::MAX, "patients");
        assert!(headers.get("Content-Range").is_some());
    }

    #[test]
    fn test_parse_pagination_extreme_range() {
        let params = FilterOptions {
            range: Some(format!("[0,{}]", u64::MAX)),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (0, MAX_PAGE_SIZE));

        let params = FilterOptions {
            range: Some(format!("[{},{}]", u64::MAX, u64::MAX)),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (u64::MAX, 1));
    }

    #[test]
    fn test_parse_pagination_caps_page_size() {
        let params = FilterOptions {
            page: Some(0),
            per_page: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (0, MAX_PAGE_SIZE));

        let params = FilterOptions {
            page: Some(u64::MAX),
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (u64::MAX - 1, 1));
    }

    #[test]
    fn test_content_range_end_is_inclusive() {
        let headers = calculate_content_range(0, 10, 3, "patients");
        assert_eq!(headers.get("Content-Range").unwrap(), "patients 0-2/3");

        let headers = calculate_content_range(2, 2, 4, "medicalTasks");
        assert_eq!(headers.get("Content-Range").unwrap(), "medicalTasks 2-3/4");
    }

    #[test]
    fn test_content_range_without_items() {
        let headers = calculate_content_range(0, 10, 0, "patients");
        assert_eq!(headers.get("Content-Range").unwrap(), "patients */0");

        let headers = calculate_content_range(40, 10, 4, "patients");
        assert_eq!(headers.get("Content-Range").unwrap(), "patients */4");
    }
}
