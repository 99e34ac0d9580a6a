use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::filtering::FilterState;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Query parameters for searching, filtering, pagination, and sorting a
/// collection.
///
/// # Searching
/// `q` runs a case-insensitive substring search over the resource's
/// declared search fields, e.g. `q=boston`.
///
/// # Filtering
/// The `filter` parameter accepts a JSON-encoded object keyed by field path:
/// - **Substring match:** `{"patient.fullName": "maria"}`
/// - **Multi-select:** `{"status": ["completed", "cancelled"]}`
/// - **Boolean:** `{"isAvailable": true}`
/// - **Same calendar day** (for fields declared as date filters):
///   `{"dateTime": "2024-03-15"}`
///
/// # Pagination
/// Two pagination formats are supported:
/// - **React Admin format:** `range=[0,9]`
/// - **Standard REST format:** `page=1&per_page=10`
///
/// # Sorting
/// Either `sort=["dateTime","DESC"]` or `sort_by=dateTime&order=DESC`.
/// Without a sort the stored order is kept.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct FilterOptions {
    /// Free-text search query.
    #[param(example = "boston")]
    pub q: Option<String>,
    /// JSON-encoded filter object.
    #[param(example = r#"{"status": ["completed", "cancelled"]}"#)]
    pub filter: Option<String>,
    /// Range for pagination in the format "[start, end]".
    #[param(example = "[0,9]")]
    pub range: Option<String>,
    /// Page number for standard REST pagination (1-based).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page for standard REST pagination.
    #[param(example = 10)]
    pub per_page: Option<u64>,
    /// Sort order in the format `["column", "order"]`, or a bare column.
    #[param(example = r#"["dateTime", "DESC"]"#)]
    pub sort: Option<String>,
    /// Sort column for standard REST format.
    #[param(example = "fullName")]
    pub sort_by: Option<String>,
    /// Sort order for standard REST format (ASC or DESC).
    #[param(example = "ASC")]
    pub order: Option<String>,
}

/// How a filter is presented and how its string values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Select,
    Checkbox,
    Date,
    Range,
}

/// A selectable value and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterChoice {
    pub value: String,
    pub label: String,
}

impl FilterChoice {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declared filter for a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterDescriptor {
    /// Field path the filter applies to
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FilterDescriptor {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            placeholder: None,
        }
    }

    /// Select filter over a fixed `(value, label)` option list.
    #[must_use]
    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        options: &[(&str, &str)],
    ) -> Self {
        let mut descriptor = Self::new(key, label, FilterKind::Select);
        descriptor.options = options
            .iter()
            .map(|(value, label)| FilterChoice::new(*value, *label))
            .collect();
        descriptor
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Display label for a raw option value, falling back to the value.
    #[must_use]
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.options
            .iter()
            .find(|choice| choice.value == value)
            .map_or(value, |choice| choice.label.as_str())
    }
}

/// Construction-time configuration of a search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Dotted field paths searched by the free-text query
    pub search_fields: Vec<String>,
    /// Filters applied initially and restored by `clear_filters`
    pub default_filters: FilterState,
    pub case_sensitive: bool,
    /// Quiet period before a typed query takes effect
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_fields: Vec::new(),
            default_filters: FilterState::default(),
            case_sensitive: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn new<S: Into<String>>(search_fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_default_filters(mut self, filters: FilterState) -> Self {
        self.default_filters = filters;
        self
    }

    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

/// Filtered records plus counters for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub data: Vec<T>,
    pub total_count: usize,
    pub has_more: bool,
}

impl<T> SearchResult<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        let total_count = data.len();
        Self {
            data,
            total_count,
            has_more: false,
        }
    }
}
