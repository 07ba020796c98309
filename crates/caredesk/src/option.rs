//! Selectable options and the type-to-filter matcher.
//!
//! A [`SelectOption`] pairs a display label with the value that is written
//! into the form when the option is chosen. [`filter_options`] narrows a
//! candidate list to the options whose label contains the query,
//! ignoring case.

use std::fmt;

/// One entry of a searchable option list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectOption<V> {
    /// The display text for this option.
    pub label: String,
    /// The payload written into the form when this option is chosen.
    pub value: V,
}

impl<V> SelectOption<V> {
    /// Create a new option.
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Whether this option's label matches `query`.
    pub fn matches(&self, query: &str) -> bool {
        label_matches(&self.label, query)
    }
}

impl<V> fmt::Display for SelectOption<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl<V, L: Into<String>> From<(L, V)> for SelectOption<V> {
    fn from((label, value): (L, V)) -> Self {
        Self::new(label, value)
    }
}

/// Case-insensitive substring test used by the option filter.
///
/// An empty query matches every label.
pub fn label_matches(label: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    label.to_lowercase().contains(&query.to_lowercase())
}

/// Narrow `candidates` to the options whose label contains `query`.
///
/// The result preserves the order of `candidates`; an empty query returns
/// every candidate.
pub fn filter_options<'a, V>(
    query: &str,
    candidates: &'a [SelectOption<V>],
) -> Vec<&'a SelectOption<V>> {
    if query.is_empty() {
        return candidates.iter().collect();
    }

    let query = query.to_lowercase();
    candidates
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&query))
        .collect()
}
