use super::resolver::Document;

// Basic safety limits
const MAX_SEARCH_QUERY_LENGTH: usize = 10_000;

/// Precompiled free-text query.
///
/// Holds the already-normalised needle so the per-record check does not
/// lower-case the query again for every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
    case_sensitive: bool,
    oversized: bool,
}

impl TextQuery {
    /// Build a query. Returns `None` for an empty or whitespace-only query,
    /// which callers treat as "match everything". A query longer than
    /// `MAX_SEARCH_QUERY_LENGTH` bytes matches nothing.
    #[must_use]
    pub fn new(query: &str, case_sensitive: bool) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }
        if query.len() > MAX_SEARCH_QUERY_LENGTH {
            tracing::debug!(length = query.len(), "Search query too long, matching nothing");
            return Some(Self {
                needle: String::new(),
                case_sensitive,
                oversized: true,
            });
        }
        let needle = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Some(Self {
            needle,
            case_sensitive,
            oversized: false,
        })
    }

    /// Does `text` contain the query?
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        if self.oversized {
            false
        } else if self.case_sensitive {
            text.contains(&self.needle)
        } else {
            text.to_lowercase().contains(&self.needle)
        }
    }

    /// Any-field-matches check over `fields`.
    pub fn matches<D: Document + ?Sized>(&self, doc: &D, fields: &[impl AsRef<str>]) -> bool {
        fields
            .iter()
            .any(|field| self.matches_text(&doc.field_text(field.as_ref())))
    }
}

/// Keep the records where at least one of `fields` contains `query`.
///
/// An empty or whitespace-only query returns every record unchanged.
/// Relative order is preserved.
pub fn text_search<'a, D, I>(
    items: I,
    fields: &[impl AsRef<str>],
    query: &str,
    case_sensitive: bool,
) -> Vec<&'a D>
where
    D: Document + ?Sized + 'a,
    I: IntoIterator<Item = &'a D>,
{
    match TextQuery::new(query, case_sensitive) {
        None => items.into_iter().collect(),
        Some(compiled) => items
            .into_iter()
            .filter(|item| compiled.matches(*item, fields))
            .collect(),
    }
}
