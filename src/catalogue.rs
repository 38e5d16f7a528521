//! TOML catalogues of searchable record collections.
//!
//! A catalogue lists named collections. Each collection names the record
//! attributes that are searched and carries its records as string maps:
//!
//! ```toml
//! [[collection]]
//! name = "quotes"
//! fields = ["text", "author"]
//!
//! [[collection.record]]
//! text = "Ich bin ein Känguru."
//! author = "Das Känguru"
//! ```
//!
//! Every collection becomes one [`DataProvider`] returning [`Hit`]s.

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Result, SearchError};
use crate::search::{DataProvider, DataSource, RecordErrorPolicy};

/// One record: attribute name to value.
pub type Record = BTreeMap<String, String>;

/// A search result from a catalogue collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub collection: String,
    pub record: Record,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalogue {
    #[serde(default, rename = "collection")]
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub name: String,
    /// Attributes matched against the query, in order.
    pub fields: Vec<String>,
    #[serde(default, rename = "record")]
    pub records: Vec<Record>,
}

impl Catalogue {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalogue: Self = toml::from_str(content)
            .map_err(|e| SearchError::Config(format!("invalid catalogue: {}", e.message())))?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .map_err(|source| SearchError::Catalogue {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_toml_str(&content).map_err(|e| SearchError::Catalogue {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Collection names must be unique and non-empty, and every collection
    /// must name at least one field.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(SearchError::Config(
                    "collection name must not be empty".into(),
                ));
            }
            if !seen.insert(collection.name.as_str()) {
                return Err(SearchError::Config(format!(
                    "duplicate collection '{}'",
                    collection.name
                )));
            }
            if collection.fields.is_empty() {
                return Err(SearchError::Config(format!(
                    "collection '{}' must list at least one field",
                    collection.name
                )));
            }
        }
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.collections.iter().map(|c| c.records.len()).sum()
    }

    /// One provider per collection over a snapshot of its records.
    pub fn providers(&self) -> Vec<DataProvider<Record, Hit>> {
        self.collections
            .iter()
            .map(|collection| {
                collection_provider(
                    &collection.name,
                    collection.fields.clone(),
                    DataSource::fixed(collection.records.clone()),
                )
            })
            .collect()
    }

    /// One provider per collection that re-reads `path` on every search.
    ///
    /// Collection names and field lists are taken from the file as it is now;
    /// later searches only pick up changed records.
    pub fn live_providers(path: &Path) -> Result<Vec<DataProvider<Record, Hit>>> {
        let catalogue = Self::load(path)?;

        Ok(catalogue
            .collections
            .into_iter()
            .map(|collection| {
                let path = path.to_path_buf();
                let name = collection.name.clone();
                let source = DataSource::try_producer(move || {
                    let current = Self::load(&path)?;
                    current
                        .collections
                        .into_iter()
                        .find(|c| c.name == name)
                        .map(|c| c.records)
                        .ok_or_else(|| anyhow!("collection '{}' is no longer in the catalogue", name))
                });
                collection_provider(&collection.name, collection.fields, source)
            })
            .collect())
    }
}

fn collection_provider(
    name: &str,
    fields: Vec<String>,
    source: DataSource<Record>,
) -> DataProvider<Record, Hit> {
    let collection = name.to_string();
    DataProvider::try_new(
        source,
        move |record: &Record| {
            fields
                .iter()
                .map(|field| {
                    record
                        .get(field)
                        .cloned()
                        .ok_or_else(|| anyhow!("record is missing field '{}'", field))
                })
                .collect::<anyhow::Result<Vec<String>>>()
        },
        move |record: &Record| {
            Ok(Hit {
                collection: collection.clone(),
                record: record.clone(),
            })
        },
    )
    .with_name(name)
    .on_record_error(RecordErrorPolicy::Skip)
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

/// `<config dir>/relevance-search/catalogue.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("relevance-search").join("catalogue.toml"))
}

/// Picks the catalogue path: an explicit one (tilde-expanded) or the default.
pub fn resolve_path(explicit: Option<&str>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(PathBuf::from(expand_tilde(path).into_owned())),
        None => default_path(),
    }
}
