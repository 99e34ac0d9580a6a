//! # Search, Filtering & Pagination
//!
//! In-memory query stages over JSON-shaped records. Each stage is a pure,
//! order-preserving function over the current snapshot, so recomputing on
//! every change is always safe.
//!
//! ## Stages
//!
//! - **[`resolver`]**: dotted field paths (`"address.city"`) to flat text
//! - **[`search`]**: free-text, any-field-matches substring search
//! - **[`conditions`]**: structured filters combined with AND
//! - **[`pagination`]**: page windows, clamping and `Content-Range`
//! - **[`sort`]**: explicit, stable consumer sort
//! - **[`advanced`]**: state behind an advanced-filter panel
//!
//! ## Filter Values
//!
//! ```rust,ignore
//! // Multi-select: status contains any of the values
//! FilterState::new().with("status", vec!["completed", "cancelled"]);
//!
//! // Same calendar day, whatever the time
//! FilterState::new().with("dateTime", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
//!
//! // From a query string, with kinds taken from the declared filters
//! FilterState::from_json_str(r#"{"dueDate": "2024-03-15"}"#).coerce_with(&descriptors);
//! ```

pub mod advanced;
pub mod conditions;
pub mod pagination;
pub mod resolver;
pub mod search;
pub mod sort;

// Re-export commonly used items
pub use advanced::{AdvancedFilter, FormattedFilter};
pub use conditions::{FilterState, FilterValue, apply_filters, parse_calendar_day};
pub use pagination::{
    Page, PageWindow, Pagination, calculate_content_range, parse_pagination, parse_range,
};
pub use resolver::{Document, resolve_path, resolve_text};
pub use search::{TextQuery, text_search};
pub use sort::{SortDirection, SortSpec, parse_sorting, sort_documents};
