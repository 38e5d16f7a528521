//! Fan-out across providers and merge into one scored sequence.

use std::time::Instant;

use super::provider::Provider;
use super::query::Query;
use super::scoring::ScoredValue;
use crate::config::SearchOptions;
use crate::error::Result;

/// Search every provider, in order, and merge their results.
///
/// Results from all providers are concatenated without truncation or
/// deduplication, then sorted by score **ascending**: the most relevant
/// entries are at the end. Reverse the sequence (or read from the tail) to
/// present best matches first. Entries with equal scores keep no promised order.
///
/// Stops at the first provider or record error.
pub fn search<U>(
    query: &Query,
    providers: &[&dyn Provider<U>],
    excl_min_score: f64,
) -> Result<Vec<ScoredValue<U>>> {
    let start = Instant::now();
    let mut results = Vec::new();

    for provider in providers {
        let before = results.len();
        for scored in provider.search(query, excl_min_score)? {
            results.push(scored?);
        }
        tracing::debug!(
            provider = provider.name(),
            matched = results.len() - before,
            "provider scored"
        );
    }

    results.sort();

    tracing::debug!(
        query = %query,
        providers = providers.len(),
        results = results.len(),
        elapsed = ?start.elapsed(),
        "search complete"
    );

    Ok(results)
}

/// [`search`] driven by validated [`SearchOptions`].
///
/// With a `limit`, only the `limit` highest-scoring entries are kept. They are
/// still returned in ascending order.
pub fn search_with<U>(
    query: &Query,
    providers: &[&dyn Provider<U>],
    options: &SearchOptions,
) -> Result<Vec<ScoredValue<U>>> {
    options.validate()?;

    let mut results = search(query, providers, options.excl_min_score)?;
    if let Some(limit) = options.limit
        && results.len() > limit
    {
        results.drain(..results.len() - limit);
    }
    Ok(results)
}
