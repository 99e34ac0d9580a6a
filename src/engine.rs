//! # Unified Search
//!
//! Combines free-text search, structured filters and pagination over an
//! in-memory collection, the way every list view of the dashboard needs it:
//!
//! ```text
//! records -> text search (debounced query) -> structured filters -> page
//! ```
//!
//! Each record is serialized to JSON once when the data is loaded so field
//! paths can be resolved without re-serializing on every keystroke. All
//! derived results are recomputed from the current snapshot on request;
//! nothing here blocks, awaits or fails.
//!
//! ```rust,ignore
//! let mut search = UnifiedSearch::new(patients, SearchConfig::new(["fullName", "address.city"]));
//! search.set_search_query("bos");
//! // ...after the debounce window
//! search.poll();
//! let page = search.page();
//! ```

use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::debounce::{DebounceState, Debounced};
use crate::filtering::{
    Document, FilterState, FilterValue, Page, PageWindow, Pagination, SortSpec, TextQuery,
    sort_documents,
};
use crate::models::{SearchConfig, SearchResult};

/// A record paired with its JSON form for field resolution.
#[derive(Debug, Clone)]
pub struct Indexed<T> {
    pub item: T,
    document: Value,
}

impl<T: Serialize> Indexed<T> {
    /// Serialize `item` for searching. A record that cannot be represented
    /// as JSON is indexed as `null` and only survives an empty query with
    /// no active filters.
    pub fn new(item: T) -> Self {
        let document = serde_json::to_value(&item).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Record could not be indexed for search");
            Value::Null
        });
        Self { item, document }
    }
}

impl<T> Indexed<T> {
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl<T> Document for Indexed<T> {
    fn field_text(&self, path: &str) -> String {
        self.document.field_text(path)
    }
}

/// Search, filter and pagination state for one list view.
#[derive(Debug, Clone)]
pub struct UnifiedSearch<T> {
    records: Vec<Indexed<T>>,
    config: SearchConfig,
    query: Debounced<String>,
    filters: FilterState,
    pagination: Pagination,
}

impl<T: Serialize> UnifiedSearch<T> {
    #[must_use]
    pub fn new(data: Vec<T>, config: SearchConfig) -> Self {
        let query = Debounced::new(String::new(), Duration::from_millis(config.debounce_ms));
        let filters = config.default_filters.clone();
        Self {
            records: data.into_iter().map(Indexed::new).collect(),
            config,
            query,
            filters,
            pagination: Pagination::default(),
        }
    }

    /// Replace the underlying collection, e.g. after a refetch.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.records = data.into_iter().map(Indexed::new).collect();
        self.pagination.reset_to_first_page();
    }
}

impl<T> UnifiedSearch<T> {
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ---------------------------------------------------------------------
    // Query
    // ---------------------------------------------------------------------

    /// The raw query as typed; echoed back immediately.
    #[must_use]
    pub fn search_query(&self) -> &str {
        self.query.latest()
    }

    /// The query the results are currently computed from.
    #[must_use]
    pub fn debounced_query(&self) -> &str {
        self.query.settled()
    }

    /// True while the typed query has not yet taken effect.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.query.is_pending()
    }

    #[must_use]
    pub fn query_state(&self) -> DebounceState {
        self.query.state()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.set_search_query_at(query, Instant::now());
    }

    pub fn set_search_query_at(&mut self, query: impl Into<String>, now: Instant) {
        self.query.set(query.into(), now);
    }

    /// Let the debounced query catch up. Returns true when the effective
    /// query changed, in which case the view is back on page 1.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        let changed = self.query.poll(now).is_some();
        if changed {
            self.pagination.reset_to_first_page();
        }
        changed
    }

    /// Apply the typed query now, skipping the rest of the quiet window.
    pub fn flush_search(&mut self) -> bool {
        let changed = self.query.flush().is_some();
        if changed {
            self.pagination.reset_to_first_page();
        }
        changed
    }

    /// When the pending query will take effect, for scheduling a poll.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.query.deadline()
    }

    /// Clear the query. Takes effect immediately rather than after the
    /// debounce window.
    pub fn clear_search(&mut self) {
        self.query.reset(String::new());
        self.pagination.reset_to_first_page();
    }

    // ---------------------------------------------------------------------
    // Filters
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.pagination.reset_to_first_page();
    }

    pub fn update_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.filters.set(key, value);
        self.pagination.reset_to_first_page();
    }

    /// Restore the configured default filters.
    pub fn clear_filters(&mut self) {
        self.filters = self.config.default_filters.clone();
        self.pagination.reset_to_first_page();
    }

    pub fn clear_all(&mut self) {
        self.clear_search();
        self.clear_filters();
    }

    // ---------------------------------------------------------------------
    // Results
    // ---------------------------------------------------------------------

    fn matching(&self) -> Vec<&Indexed<T>> {
        let text = TextQuery::new(self.query.settled(), self.config.case_sensitive);
        let has_filters = self.filters.active().next().is_some();

        self.records
            .iter()
            .filter(|record| {
                text.as_ref()
                    .is_none_or(|q| q.matches(*record, &self.config.search_fields))
            })
            .filter(|record| !has_filters || self.filters.matches(*record))
            .collect()
    }

    /// Records passing both the text search and every active filter, in
    /// their original order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&T> {
        self.matching().into_iter().map(|record| &record.item).collect()
    }

    /// Like [`UnifiedSearch::filtered`], then stably sorted by `spec`.
    #[must_use]
    pub fn filtered_sorted(&self, spec: &SortSpec) -> Vec<&T> {
        let mut matching = self.matching();
        sort_documents(&mut matching, spec);
        matching.into_iter().map(|record| &record.item).collect()
    }

    #[must_use]
    pub fn search_result(&self) -> SearchResult<&T> {
        SearchResult::new(self.filtered())
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.matching().len()
    }

    // ---------------------------------------------------------------------
    // Pagination
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[must_use]
    pub fn window(&self) -> PageWindow {
        self.pagination.window(self.total_count())
    }

    /// The current page of filtered records.
    #[must_use]
    pub fn page(&self) -> Page<&T> {
        self.pagination.page(&self.filtered())
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.total_count();
        self.pagination.go_to_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.total_count();
        self.pagination.next_page(total);
    }

    pub fn previous_page(&mut self) {
        let total = self.total_count();
        self.pagination.previous_page(total);
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.pagination.set_items_per_page(items_per_page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Maria Rodriguez", "city": "Boston", "status": "active"}),
            json!({"name": "John Smith", "city": "Austin", "status": "inactive"}),
            json!({"name": "Bo Stern", "city": "Denver", "status": "active"}),
        ]
    }

    fn names(items: &[&Value]) -> Vec<String> {
        items
            .iter()
            .map(|v| v["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_query_only_applies_after_debounce() {
        let start = Instant::now();
        let mut search = UnifiedSearch::new(people(), SearchConfig::new(["city"]));

        search.set_search_query_at("bos", start);
        assert!(search.is_searching());
        assert_eq!(search.search_query(), "bos");
        assert_eq!(search.filtered().len(), 3);

        assert!(search.poll_at(start + Duration::from_millis(300)));
        assert!(!search.is_searching());
        assert_eq!(names(&search.filtered()), vec!["Maria Rodriguez"]);
    }

    #[test]
    fn test_flush_search() {
        let mut search = UnifiedSearch::new(people(), SearchConfig::new(["name", "city"]));
        search.set_search_query("bo");
        assert!(search.flush_search());
        assert_eq!(names(&search.filtered()), vec!["Maria Rodriguez", "Bo Stern"]);
    }

    #[test]
    fn test_filters_and_search_combine() {
        let mut search = UnifiedSearch::new(people(), SearchConfig::new(["name", "city"]));
        search.set_search_query("bo");
        search.flush_search();
        search.update_filter("status", "inactive");
        assert!(search.filtered().is_empty());

        search.update_filter("status", vec!["active"]);
        assert_eq!(search.filtered().len(), 2);
    }

    #[test]
    fn test_clear_filters_restores_defaults() {
        let config = SearchConfig::new(["name"])
            .with_default_filters(FilterState::new().with("status", "inactive"));
        let mut search = UnifiedSearch::new(people(), config);
        assert_eq!(names(&search.filtered()), vec!["John Smith"]);

        search.set_filters(FilterState::new());
        assert_eq!(search.filtered().len(), 3);

        search.clear_filters();
        assert_eq!(names(&search.filtered()), vec!["John Smith"]);
    }

    #[test]
    fn test_clear_all_is_immediate() {
        let mut search = UnifiedSearch::new(people(), SearchConfig::new(["name"]));
        search.set_search_query("maria");
        search.flush_search();
        search.update_filter("city", "boston");
        assert_eq!(search.total_count(), 1);

        search.clear_all();
        assert_eq!(search.search_query(), "");
        assert!(!search.is_searching());
        assert_eq!(search.total_count(), 3);
    }

    #[test]
    fn test_upstream_change_resets_page() {
        let data: Vec<Value> = (0..23)
            .map(|i| json!({"n": i, "kind": if i % 2 == 0 { "even" } else { "odd" }}))
            .collect();
        let mut search = UnifiedSearch::new(data, SearchConfig::new(["kind"]));
        search.set_items_per_page(5);
        search.go_to_page(4);
        assert_eq!(search.window().current_page, 4);

        search.update_filter("kind", "odd");
        assert_eq!(search.window().current_page, 1);
        assert_eq!(search.window().total_count, 11);
    }

    #[test]
    fn test_case_sensitive_config() {
        let config = SearchConfig::new(["name"]).with_case_sensitive(true);
        let mut search = UnifiedSearch::new(people(), config);
        search.set_search_query("maria");
        search.flush_search();
        assert!(search.filtered().is_empty());
    }

    #[test]
    fn test_filtered_sorted() {
        let mut search = UnifiedSearch::new(people(), SearchConfig::new(["name"]));
        search.update_filter("status", "active");
        let spec = SortSpec::new("city", crate::filtering::SortDirection::Asc);
        let sorted = search.filtered_sorted(&spec);
        assert_eq!(names(&sorted), vec!["John Smith", "Maria Rodriguez", "Bo Stern"]);
    }

    #[test]
    fn test_search_result_counts() {
        let search = UnifiedSearch::new(people(), SearchConfig::new(["name"]));
        let result = search.search_result();
        assert_eq!(result.total_count, 3);
        assert!(!result.has_more);
    }
}
