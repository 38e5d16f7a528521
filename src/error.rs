//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for relevance-search operations.
///
/// Application code (catalogue loading, the binary) works with `anyhow::Result`
/// and `.context()`; library surfaces return [`SearchError`].
pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// Errors surfaced while running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A producer-style data source failed when invoked for a search.
    #[error("data source for provider '{provider}' failed")]
    Source {
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    /// A fallible key or convert function failed for one record while the
    /// provider was set to abort on record errors.
    #[error("record conversion failed in provider '{provider}'")]
    Record {
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid search options or catalogue content.
    #[error("config error: {0}")]
    Config(String),

    /// A catalogue file could not be read or parsed.
    #[error("failed to load catalogue at {}", path.display())]
    Catalogue {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl SearchError {
    /// Name of the provider the error originated from, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Source { provider, .. } | Self::Record { provider, .. } => Some(provider),
            Self::Config(_) | Self::Catalogue { .. } => None,
        }
    }
}
