use std::cmp::Ordering;

use super::resolver::Document;
use crate::models::FilterOptions;

const DEFAULT_SORT_ORDER: &str = "ASC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// An explicit consumer-requested ordering. Filtering never sorts on its
/// own; a `SortSpec` is only applied when a caller asks for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Parse sort column and order from JSON array format
fn parse_json_sort(json: &str) -> Option<(String, String)> {
    let sort_vec: Vec<String> = serde_json::from_str(json).ok()?;
    let column = sort_vec.first()?.clone();
    let order = sort_vec
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string());
    Some((column, order))
}

/// Convert sort order string to a direction; anything but ASC is descending
fn parse_order(sort_order: &str) -> SortDirection {
    if sort_order.eq_ignore_ascii_case("ASC") {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    }
}

/// Parse sorting from `FilterOptions`, supporting both React Admin and standard REST formats
///
/// Returns `None` when no sort was requested.
#[must_use]
pub fn parse_sorting(params: &FilterOptions) -> Option<SortSpec> {
    let order = || params.order.as_deref().unwrap_or(DEFAULT_SORT_ORDER).to_string();

    let (column, sort_order) = if let Some(sort_by) = &params.sort_by {
        // Standard REST format: sort_by=column&order=ASC/DESC
        (sort_by.clone(), order())
    } else if let Some(sort) = &params.sort {
        if sort.starts_with('[') {
            // React Admin format: sort=["column", "ASC"]
            parse_json_sort(sort)?
        } else {
            (sort.clone(), order())
        }
    } else {
        return None;
    };

    if column.trim().is_empty() {
        return None;
    }
    Some(SortSpec::new(column, parse_order(&sort_order)))
}

/// Sort key for a resolved field text.
///
/// Keys order as empty text, then finite numbers, then any other text
/// (case-insensitive). Every pair of keys compares consistently, so mixed
/// columns such as `"9"`, `"10"`, `"1a"` and `"NaN"` still sort.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(trimmed.to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Stable sort of `items` by the resolved value of `spec.field`.
pub fn sort_documents<D: Document + ?Sized>(items: &mut [&D], spec: &SortSpec) {
    // Resolve each key once; field_text may flatten nested values
    let mut keyed: Vec<(SortKey, &D)> = items
        .iter()
        .map(|item| (SortKey::from_text(&item.field_text(&spec.field)), *item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    for (slot, (_, item)) in items.iter_mut().zip(keyed) {
        *slot = item;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_parse_json_sort_valid() {
        let (col, order) = parse_json_sort(r#"["name", "DESC"]"#).unwrap();
        assert_eq!(col, "name");
        assert_eq!(order, "DESC");
    }

    #[test]
    fn test_parse_json_sort_partial() {
        let (col, order) = parse_json_sort(r#"["email"]"#).unwrap();
        assert_eq!(col, "email");
        assert_eq!(order, DEFAULT_SORT_ORDER);
    }

    #[test]
    fn test_parse_json_sort_invalid() {
        assert!(parse_json_sort("invalid json").is_none());
        assert!(parse_json_sort("[]").is_none());
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order("ASC"), SortDirection::Asc);
        assert_eq!(parse_order("asc"), SortDirection::Asc);
        assert_eq!(parse_order("DESC"), SortDirection::Desc);
        assert_eq!(parse_order("random"), SortDirection::Desc);
    }

    #[test]
    fn test_parse_sorting_formats() {
        let rest = FilterOptions {
            sort_by: Some("fullName".to_string()),
            order: Some("DESC".to_string()),
            sort: Some(r#"["email", "ASC"]"#.to_string()),
            ..Default::default()
        };
        assert_eq!(
            parse_sorting(&rest),
            Some(SortSpec::new("fullName", SortDirection::Desc))
        );

        let react_admin = FilterOptions {
            sort: Some(r#"["dateTime", "DESC"]"#.to_string()),
            ..Default::default()
        };
        assert_eq!(
            parse_sorting(&react_admin),
            Some(SortSpec::new("dateTime", SortDirection::Desc))
        );

        let plain = FilterOptions {
            sort: Some("status".to_string()),
            ..Default::default()
        };
        assert_eq!(
            parse_sorting(&plain),
            Some(SortSpec::new("status", SortDirection::Asc))
        );

        assert_eq!(parse_sorting(&FilterOptions::default()), None);
    }

    #[test]
    fn test_numeric_aware_sort() {
        let data: Vec<Value> = vec![
            json!({"n": "10", "name": "b"}),
            json!({"n": "9", "name": "A"}),
            json!({"n": "100", "name": "c"}),
        ];
        let mut items: Vec<&Value> = data.iter().collect();
        sort_documents(&mut items, &SortSpec::new("n", SortDirection::Asc));
        let order: Vec<&str> = items.iter().map(|v| v["n"].as_str().unwrap()).collect();
        assert_eq!(order, vec!["9", "10", "100"]);

        sort_documents(&mut items, &SortSpec::new("name", SortDirection::Desc));
        let order: Vec<&str> = items.iter().map(|v| v["name"].as_str().unwrap()).collect();
        assert_eq!(order, vec!["c", "b", "A"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let data: Vec<Value> = vec![
            json!({"id": 1, "status": "pending"}),
            json!({"id": 2, "status": "done"}),
            json!({"id": 3, "status": "pending"}),
        ];
        let mut items: Vec<&Value> = data.iter().collect();
        sort_documents(&mut items, &SortSpec::new("status", SortDirection::Asc));
        let ids: Vec<i64> = items.iter().map(|v| v["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_mixed_numeric_and_text_keys_sort_totally() {
        let data: Vec<Value> = (0..200)
            .map(|i| {
                let key = match i % 3 {
                    0 => format!("{i}"),
                    1 => format!("{}a", i % 17),
                    _ => "NaN".to_string(),
                };
                json!({ "k": key })
            })
            .collect();
        let mut items: Vec<&Value> = data.iter().collect();
        sort_documents(&mut items, &SortSpec::new("k", SortDirection::Asc));

        let keys: Vec<&str> = items.iter().map(|v| v["k"].as_str().unwrap()).collect();
        assert_eq!(keys.len(), 200);
        assert_eq!(keys[0], "0");
        // Numbers come first, in numeric order
        let numbers: Vec<f64> = keys
            .iter()
            .map_while(|k| k.parse::<f64>().ok().filter(|n| n.is_finite()))
            .collect();
        assert_eq!(numbers.len(), 67);
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        // Then text, including the NaN spelling, in lowercase order
        let texts: Vec<String> = keys[67..].iter().map(|k| k.to_lowercase()).collect();
        assert!(texts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_keys_sort_first() {
        let data: Vec<Value> = vec![json!({"k": "b"}), json!({"k": 3}), json!({})];
        let mut items: Vec<&Value> = data.iter().collect();
        sort_documents(&mut items, &SortSpec::new("k", SortDirection::Asc));
        assert_eq!(items, vec![&data[2], &data[1], &data[0]]);
    }
}
