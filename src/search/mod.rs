//! Relevance search over in-memory data providers.
//!
//! This module provides the query representation, the per-field scoring rule,
//! the provider abstraction and the fan-out/merge entry point.

// Module declarations
mod cache;
mod merge;
mod provider;
mod query;
mod scoring;

// Public re-exports (used via lib.rs)
pub use cache::{DEFAULT_CAPACITY, QueryCache};
pub use merge::{search, search_with};
pub use provider::{DataProvider, DataSource, Fields, Provider, RecordErrorPolicy, ScoredIter};
pub use query::Query;
pub use scoring::{ScoredValue, relevance};
