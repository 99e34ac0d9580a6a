use serde_json::Value;

/// Anything that can produce searchable text for a dotted field path.
///
/// Every stage of the search pipeline is written against this trait so it
/// works the same over raw JSON documents and over the engine's indexed
/// records.
pub trait Document {
    /// Resolve `path` to a string suitable for substring comparison.
    ///
    /// Never fails: missing segments yield an empty string.
    fn field_text(&self, path: &str) -> String;
}

impl Document for Value {
    fn field_text(&self, path: &str) -> String {
        resolve_text(self, path)
    }
}

impl<D: Document + ?Sized> Document for &D {
    fn field_text(&self, path: &str) -> String {
        (**self).field_text(path)
    }
}

/// Walk `doc` along a dotted `path` (e.g. `"address.city"`).
///
/// Returns `None` when any segment is missing or when an intermediate value
/// is a scalar. A numeric segment indexes into an array, so
/// `"medications.0.name"` addresses the first medication.
#[must_use]
pub fn resolve_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = doc;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve `path` against `doc` and flatten the result into one string.
///
/// - missing or `null` values give `""`
/// - a named segment applied to a sequence is applied to every element,
///   so `"medicalHistory.condition"` yields all conditions joined by spaces
/// - sequences join their elements with spaces, objects inside a sequence
///   contribute their own values joined with spaces
/// - objects join their direct values with spaces
/// - scalars use their plain string form (strings unquoted)
#[must_use]
pub fn resolve_text(doc: &Value, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let segments: Vec<&str> = path.split('.').collect();
    let mut parts = Vec::new();
    collect_text(doc, &segments, &mut parts);
    parts.join(" ")
}

fn collect_text(value: &Value, segments: &[&str], parts: &mut Vec<String>) {
    let Some((segment, rest)) = segments.split_first() else {
        let text = flatten(value);
        if !text.is_empty() {
            parts.push(text);
        }
        return;
    };
    match value {
        Value::Object(map) => {
            if let Some(next) = map.get(*segment) {
                collect_text(next, rest, parts);
            }
        }
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => {
                if let Some(next) = items.get(index) {
                    collect_text(next, rest, parts);
                }
            }
            Err(_) => {
                for item in items {
                    collect_text(item, segments, parts);
                }
            }
        },
        _ => {}
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(_) => join_values(item),
                other => scalar_text(other),
            })
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(_) => join_values(value),
        other => scalar_text(other),
    }
}

fn join_values(value: &Value) -> String {
    let Value::Object(map) = value else {
        return scalar_text(value);
    };
    map.values().map(scalar_text).collect::<Vec<_>>().join(" ")
}

/// String form of a single value. Nested containers one level below an
/// object or array element are flattened recursively so no JSON punctuation
/// ever leaks into search text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => flatten(value),
    }
}
