//! Relevance scoring and the scored result envelope.

use serde::Serialize;
use std::cmp::Ordering;

use super::query::Query;

/// Score a query against one record's lower-cased field values.
///
/// - 1.0 when the whole lower-cased query occurs in any field value. The empty
///   string occurs in every string, so a query without words scores 1.0 against
///   any record with at least one field.
/// - Otherwise, for each word, the number of fields containing it weighted by
///   `len(word) / words_len`, summed, then divided by the number of fields.
/// - 0.0 for a record without fields.
pub fn relevance<S: AsRef<str>>(query: &Query, field_values: &[S]) -> f64 {
    let original = query.original();
    if field_values
        .iter()
        .any(|value| value.as_ref().contains(original))
    {
        return 1.0;
    }

    if field_values.is_empty() {
        return 0.0;
    }

    let weighted_hits: f64 = query
        .weighted_words()
        .map(|(word, weight)| {
            let hits = field_values
                .iter()
                .filter(|value| value.as_ref().contains(word))
                .count();
            weight * hits as f64
        })
        .sum();

    weighted_hits / field_values.len() as f64
}

/// A result paired with its relevance score.
///
/// Ordering and equality look only at `score` (via [`f64::total_cmp`]); the
/// payload is never compared, so equal scores carry no relative order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredValue<T> {
    pub score: f64,
    pub value: T,
}

impl<T> ScoredValue<T> {
    pub const fn new(score: f64, value: T) -> Self {
        Self { score, value }
    }

    /// Transform the payload, keeping the score.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScoredValue<U> {
        ScoredValue {
            score: self.score,
            value: f(self.value),
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> PartialEq for ScoredValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for ScoredValue<T> {}

impl<T> PartialOrd for ScoredValue<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScoredValue<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}
