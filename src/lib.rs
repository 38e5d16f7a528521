//! Free-text relevance search over small, heterogeneous, in-memory collections.
//!
//! Build a [`Query`] once, wrap each content source in a [`DataProvider`], and
//! pass them all to [`search`]. Results come back sorted by score ascending.

pub mod catalogue;
pub mod cli;
pub mod config;
pub mod error;
pub mod search;
pub mod tracing;

pub use config::SearchOptions;
pub use error::{Result, SearchError};
pub use search::{
    DataProvider, DataSource, Fields, Provider, Query, QueryCache, RecordErrorPolicy, ScoredValue,
    search, search_with,
};
