use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::resolver::Document;
use crate::models::{FilterDescriptor, FilterKind};

// Basic safety limits
const MAX_FILTER_JSON_LENGTH: usize = 10_000;

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";
/// JSON tag that keeps an `OnDate` filter a date across serialisation
const ON_DATE_KEY: &str = "onDate";
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// One structured constraint.
///
/// Dispatch in [`FilterValue::matches`] is exhaustive over these variants:
///
/// | Variant | Rule |
/// |---|---|
/// | `None` | inactive, always matches |
/// | `MultiSelect` | field text contains at least one value (case-insensitive) |
/// | `Flag` | field text coerced to a boolean equals the flag |
/// | `OnDate` | field text parsed as a date falls on the same calendar day |
/// | `Text` / `Number` | field text contains the value (case-insensitive) |
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FilterValue {
    #[default]
    None,
    Text(String),
    Number(serde_json::Number),
    MultiSelect(Vec<String>),
    Flag(bool),
    OnDate(NaiveDate),
}

impl FilterValue {
    /// Convert a raw JSON value. Strings always become `Text`; use
    /// [`FilterValue::coerce_for`] to lift them into dates or flags.
    /// `{"onDate": "YYYY-MM-DD"}` is read back as `OnDate`, which is how
    /// dates are written out.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(b) => Self::Flag(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::MultiSelect(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Object(map) => {
                let day = match (map.len(), map.get(ON_DATE_KEY)) {
                    (1, Some(Value::String(text))) => parse_calendar_day(text),
                    _ => None,
                };
                day.map_or_else(
                    || {
                        tracing::debug!("Ignoring object-valued filter entry");
                        Self::None
                    },
                    Self::OnDate,
                )
            }
        }
    }

    /// Reinterpret a string value according to the declared filter kind.
    ///
    /// Date filters turn parseable strings into `OnDate`, checkbox filters
    /// turn `"true"`/`"false"` into `Flag`. Anything else is left as is.
    #[must_use]
    pub fn coerce_for(self, kind: FilterKind) -> Self {
        match (kind, self) {
            (FilterKind::Date, Self::Text(s)) => match parse_calendar_day(&s) {
                Some(day) => Self::OnDate(day),
                None => Self::Text(s),
            },
            (FilterKind::Checkbox, Self::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Self::Flag(true),
                "false" => Self::Flag(false),
                _ => Self::Text(s),
            },
            (_, other) => other,
        }
    }

    /// Empty strings, empty selections and `None` impose no constraint.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::None => false,
            Self::Text(s) => !s.is_empty(),
            Self::MultiSelect(values) => !values.is_empty(),
            Self::Number(_) | Self::Flag(_) | Self::OnDate(_) => true,
        }
    }

    /// Test one resolved field text against this constraint.
    #[must_use]
    pub fn matches(&self, field_text: &str) -> bool {
        match self {
            Self::None => true,
            Self::MultiSelect(values) if values.is_empty() => true,
            Self::MultiSelect(values) => {
                let haystack = field_text.to_lowercase();
                values
                    .iter()
                    .any(|value| haystack.contains(&value.to_lowercase()))
            }
            Self::Flag(expected) => is_truthy(field_text) == *expected,
            Self::OnDate(day) => parse_calendar_day(field_text) == Some(*day),
            Self::Text(value) => field_text.to_lowercase().contains(&value.to_lowercase()),
            Self::Number(value) => field_text.to_lowercase().contains(&value.to_string()),
        }
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::None => Self::Null,
            FilterValue::Text(s) => Self::String(s),
            FilterValue::Number(n) => Self::Number(n),
            FilterValue::MultiSelect(values) => {
                Self::Array(values.into_iter().map(Self::String).collect())
            }
            FilterValue::Flag(b) => Self::Bool(b),
            FilterValue::OnDate(day) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    ON_DATE_KEY.to_string(),
                    Self::String(day.format(DATE_ONLY_FORMAT).to_string()),
                );
                Self::Object(map)
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::OnDate(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::MultiSelect(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::MultiSelect(values.into_iter().map(str::to_string).collect())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Truthiness of resolved field text.
///
/// Empty text is false. Because the resolver renders JSON `false` and `0`
/// as text, those literal spellings are false too.
fn is_truthy(text: &str) -> bool {
    let trimmed = text.trim();
    !(trimmed.is_empty() || trimmed.eq_ignore_ascii_case("false") || trimmed == "0")
}

/// Parse a date or date-time string down to its calendar day.
///
/// Offsets are normalised to UTC before taking the day; naive date-times
/// are taken as written. Returns `None` for anything unparseable.
#[must_use]
pub fn parse_calendar_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT).ok()
}

/// The current set of structured constraints, keyed by field path.
///
/// Keys iterate in sorted order, which keeps formatted output and
/// serialized state deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, FilterValue>);

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that actually constrain the result.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.iter().filter(|(_, value)| value.is_active())
    }

    /// Parse the JSON object carried in a `filter` query parameter.
    ///
    /// Invalid or oversized JSON yields an empty state; the reason is
    /// logged rather than surfaced.
    #[must_use]
    pub fn from_json_str(filter: &str) -> Self {
        if filter.len() > MAX_FILTER_JSON_LENGTH {
            tracing::debug!(length = filter.len(), "Filter string too long, ignoring");
            return Self::new();
        }
        match serde_json::from_str::<BTreeMap<String, Value>>(filter) {
            Ok(parsed) => Self(
                parsed
                    .into_iter()
                    .map(|(key, value)| (key, FilterValue::from_json(&value)))
                    .collect(),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "Invalid JSON in filter string");
                Self::new()
            }
        }
    }

    /// Apply each declared descriptor's kind to the matching entry.
    /// Undeclared keys are kept untouched.
    #[must_use]
    pub fn coerce_with(self, descriptors: &[FilterDescriptor]) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|(key, value)| {
                    let value = match descriptors.iter().find(|d| d.key == key) {
                        Some(descriptor) => value.coerce_for(descriptor.kind),
                        None => {
                            tracing::debug!(key = %key, "Applying undeclared filter key");
                            value
                        }
                    };
                    (key, value)
                })
                .collect(),
        )
    }

    /// Drop entries that have no declared descriptor.
    #[must_use]
    pub fn retain_declared(mut self, descriptors: &[FilterDescriptor]) -> Self {
        self.0
            .retain(|key, _| descriptors.iter().any(|d| &d.key == key));
        self
    }

    /// Does `doc` satisfy every active entry?
    pub fn matches<D: Document + ?Sized>(&self, doc: &D) -> bool {
        self.active()
            .all(|(key, value)| value.matches(&doc.field_text(key)))
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Keep the records that satisfy every active entry of `filters`.
///
/// Keys are applied whether or not they were declared in a filter
/// configuration. With no active entries every record is returned.
pub fn apply_filters<'a, D, I>(items: I, filters: &FilterState) -> Vec<&'a D>
where
    D: Document + ?Sized + 'a,
    I: IntoIterator<Item = &'a D>,
{
    if filters.active().next().is_none() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| filters.matches(*item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tasks() -> Vec<Value> {
        vec![
            json!({"id": 1, "status": "pending", "urgent": true, "dueDate": "2024-03-14T09:00:00Z"}),
            json!({"id": 2, "status": "completed", "urgent": false, "dueDate": "2024-03-15T22:30:00Z"}),
            json!({"id": 3, "status": "cancelled", "urgent": false, "dueDate": "2024-03-15"}),
            json!({"id": 4, "status": "overdue", "dueDate": "not a date"}),
        ]
    }

    fn ids(result: &[&Value]) -> Vec<i64> {
        result.iter().filter_map(|v| v["id"].as_i64()).collect()
    }

    #[test]
    fn test_multi_select_status() {
        let data = tasks();
        let filters = FilterState::new().with("status", vec!["completed", "cancelled"]);
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2, 3]);
    }

    #[test]
    fn test_empty_values_are_inactive() {
        let data = tasks();
        let filters = FilterState::new()
            .with("status", "")
            .with("urgent", FilterValue::None)
            .with("dueDate", Vec::<String>::new());
        assert_eq!(apply_filters(&data, &filters).len(), data.len());
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let data = tasks();
        let filters = FilterState::new().with("status", "CANCEL");
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![3]);
    }

    #[test]
    fn test_number_filter_stringifies() {
        let data = tasks();
        let filters = FilterState::new().with("id", 3_i64);
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![3]);
    }

    #[test]
    fn test_flag_filter() {
        let data = tasks();
        let urgent = FilterState::new().with("urgent", true);
        assert_eq!(ids(&apply_filters(&data, &urgent)), vec![1]);

        // Missing fields resolve to "" which is false
        let not_urgent = FilterState::new().with("urgent", false);
        assert_eq!(ids(&apply_filters(&data, &not_urgent)), vec![2, 3, 4]);
    }

    #[test]
    fn test_date_filter_same_calendar_day() {
        let data = tasks();
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let filters = FilterState::new().with("dueDate", day);
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2, 3]);
    }

    #[test]
    fn test_unparseable_date_does_not_match() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(!FilterValue::OnDate(day).matches("not a date"));
        assert!(!FilterValue::OnDate(day).matches(""));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let data = tasks();
        let filters = FilterState::new()
            .with("status", vec!["pending", "completed"])
            .with("urgent", false);
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2]);
    }

    #[test]
    fn test_unknown_key_is_applied() {
        let data = tasks();
        let filters = FilterState::new().with("ward", "north");
        assert!(apply_filters(&data, &filters).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let data = tasks();
        let filters = FilterState::new().with("status", vec!["completed", "overdue"]);
        let once = apply_filters(&data, &filters);
        let twice = apply_filters(once.iter().copied(), &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_calendar_day_formats() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_calendar_day("2024-03-15"), Some(day));
        assert_eq!(parse_calendar_day("2024-03-15T22:30:00Z"), Some(day));
        assert_eq!(parse_calendar_day("2024-03-15T10:00"), Some(day));
        assert_eq!(parse_calendar_day("2024-03-15T10:00:00.123"), Some(day));
        assert_eq!(parse_calendar_day("2024-03-15 10:00:00"), Some(day));
        // 23:30 at -05:00 is already the 16th in UTC
        assert_eq!(
            parse_calendar_day("2024-03-15T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 3, 16)
        );
        assert_eq!(parse_calendar_day("15/03/2024"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy("true"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("1"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("FALSE"));
        assert!(!is_truthy("0"));
    }

    #[test]
    fn test_from_json_str() {
        let state = FilterState::from_json_str(
            r#"{"status": ["completed"], "urgent": true, "priority": "high", "ward": null, "nested": {"a": 1}}"#,
        );
        assert_eq!(
            state.get("status"),
            Some(&FilterValue::MultiSelect(vec!["completed".to_string()]))
        );
        assert_eq!(state.get("urgent"), Some(&FilterValue::Flag(true)));
        assert_eq!(state.get("priority"), Some(&FilterValue::Text("high".into())));
        assert_eq!(state.get("ward"), Some(&FilterValue::None));
        assert_eq!(state.get("nested"), Some(&FilterValue::None));
        assert_eq!(state.active().count(), 3);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(FilterState::from_json_str("not json").is_empty());
        assert!(FilterState::from_json_str("[1,2]").is_empty());
        assert!(FilterState::from_json_str(&"x".repeat(20_000)).is_empty());
    }

    #[test]
    fn test_coerce_with_descriptors() {
        let descriptors = vec![
            FilterDescriptor::new("dueDate", "Due date", FilterKind::Date),
            FilterDescriptor::new("urgent", "Urgent", FilterKind::Checkbox),
            FilterDescriptor::new("status", "Status", FilterKind::Select),
        ];
        let state = FilterState::new()
            .with("dueDate", "2024-03-15")
            .with("urgent", "false")
            .with("status", "2024-03-15")
            .with("undeclared", "true")
            .coerce_with(&descriptors);

        assert_eq!(
            state.get("dueDate"),
            Some(&FilterValue::OnDate(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()))
        );
        assert_eq!(state.get("urgent"), Some(&FilterValue::Flag(false)));
        assert_eq!(state.get("status"), Some(&FilterValue::Text("2024-03-15".into())));
        assert_eq!(state.get("undeclared"), Some(&FilterValue::Text("true".into())));
    }

    #[test]
    fn test_retain_declared() {
        let descriptors = vec![FilterDescriptor::new("status", "Status", FilterKind::Select)];
        let state = FilterState::new()
            .with("status", "pending")
            .with("ward", "north")
            .retain_declared(&descriptors);
        assert_eq!(state.len(), 1);
        assert!(state.get("ward").is_none());
    }

    #[test]
    fn test_serde_round_trip_of_date() {
        let state = FilterState::new()
            .with("dueDate", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, json!({"dueDate": {"onDate": "2024-03-15"}}));

        let back: FilterState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_deserialized_date_keeps_calendar_day_semantics() {
        let state: FilterState =
            serde_json::from_value(json!({"dateTime": {"onDate": "2024-03-15"}})).unwrap();
        // 22:30 at -05:00 is already the 16th in UTC, so a substring match
        // on "2024-03-15" would wrongly accept it
        assert!(!state.matches(&json!({"dateTime": "2024-03-15T22:30:00-05:00"})));
        assert!(state.matches(&json!({"dateTime": "2024-03-15T08:00:00-05:00"})));

        let odd: FilterState =
            serde_json::from_value(json!({"dateTime": {"onDate": "soon"}})).unwrap();
        assert_eq!(odd.get("dateTime"), Some(&FilterValue::None));
    }
}
