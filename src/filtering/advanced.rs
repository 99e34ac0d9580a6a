use serde::Serialize;
use std::fmt;

use super::conditions::{FilterState, FilterValue};
use crate::models::FilterDescriptor;

type ChangeListener = Box<dyn Fn(&FilterState) + Send + Sync>;

/// One active filter rendered for display, e.g. as a removable chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFilter {
    pub key: String,
    pub label: String,
    pub display_value: String,
}

/// State behind an advanced-filter panel: declared filters, their current
/// values, the defaults to restore, and whether the panel is open.
pub struct AdvancedFilter {
    descriptors: Vec<FilterDescriptor>,
    values: FilterState,
    defaults: FilterState,
    is_open: bool,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for AdvancedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvancedFilter")
            .field("descriptors", &self.descriptors)
            .field("values", &self.values)
            .field("defaults", &self.defaults)
            .field("is_open", &self.is_open)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl AdvancedFilter {
    #[must_use]
    pub fn new(descriptors: Vec<FilterDescriptor>) -> Self {
        Self {
            descriptors,
            values: FilterState::new(),
            defaults: FilterState::new(),
            is_open: false,
            on_change: None,
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: FilterState) -> Self {
        self.values = defaults.clone();
        self.defaults = defaults;
        self
    }

    /// Register a listener called with the new values after every change.
    #[must_use]
    pub fn on_change(mut self, listener: impl Fn(&FilterState) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    fn notify(&self) {
        if let Some(listener) = &self.on_change {
            listener(&self.values);
        }
    }

    #[must_use]
    pub fn descriptors(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    #[must_use]
    pub fn values(&self) -> &FilterState {
        &self.values
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn active_filters_count(&self) -> usize {
        self.values.active().count()
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.active_filters_count() > 0
    }

    /// Active values with labels resolved. Keys without a declared
    /// descriptor are not shown.
    #[must_use]
    pub fn formatted_filters(&self) -> Vec<FormattedFilter> {
        self.values
            .active()
            .filter_map(|(key, value)| {
                let descriptor = self.descriptors.iter().find(|d| d.key == key)?;
                Some(FormattedFilter {
                    key: key.to_string(),
                    label: descriptor.label.clone(),
                    display_value: display_value(descriptor, value),
                })
            })
            .collect()
    }

    pub fn set_filter_value(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.values.set(key, value);
        self.notify();
    }

    pub fn set_filter_values(&mut self, values: FilterState) {
        self.values = values;
        self.notify();
    }

    /// Remove `key` entirely.
    pub fn clear_filter(&mut self, key: &str) {
        self.values.remove(key);
        self.notify();
    }

    /// Back to the defaults, not to an empty state.
    pub fn clear_all_filters(&mut self) {
        self.values = self.defaults.clone();
        self.notify();
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }
}

fn display_value(descriptor: &FilterDescriptor, value: &FilterValue) -> String {
    match value {
        FilterValue::MultiSelect(values) => values
            .iter()
            .map(|v| descriptor.label_for(v))
            .collect::<Vec<_>>()
            .join(", "),
        FilterValue::Flag(true) => "Yes".to_string(),
        FilterValue::Flag(false) => "No".to_string(),
        FilterValue::OnDate(day) => day.format("%Y-%m-%d").to_string(),
        FilterValue::Text(text) => descriptor.label_for(text).to_string(),
        FilterValue::Number(n) => {
            let raw = n.to_string();
            descriptor.label_for(&raw).to_string()
        }
        FilterValue::None => String::new(),
    }
}
