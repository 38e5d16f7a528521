//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `quotes`: quote records searched by text and author
//! - `people`: person records searched by name only
//! - `comics`: comic titles behind a producer source that counts its invocations
//!
//! # Shared Infrastructure
//!
//! [`TempCatalogue`] writes catalogue files into a temporary directory that is
//! cleaned up when dropped.

// Each integration test crate uses a different subset of these.
#![allow(dead_code)]

use relevance_search::{DataProvider, DataSource};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: &'static str,
    pub born: u16,
}

/// The public result shape every fixture provider converts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Quote(String),
    Person(String),
    Comic(String),
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "Ich bin ein Känguru.",
        author: "Das Känguru",
    },
    Quote {
        text: "Halt mal kurz.",
        author: "Das Känguru",
    },
    Quote {
        text: "Kleiner Mann, was nun?",
        author: "Hans Fallada",
    },
];

pub const PEOPLE: &[Person] = &[
    Person {
        name: "Marc-Uwe Kling",
        born: 1982,
    },
    Person {
        name: "Hans Fallada",
        born: 1893,
    },
];

pub const COMICS: &[&str] = &["Kangaroo Soundboard", "Comic Strip", "Känguru-Comic 42"];

#[fixture]
pub fn quotes() -> DataProvider<Quote, Found> {
    DataProvider::new(
        QUOTES.to_vec(),
        |q: &Quote| [q.text, q.author],
        |q: &Quote| Found::Quote(q.text.to_string()),
    )
    .with_name("quotes")
}

#[fixture]
pub fn people() -> DataProvider<Person, Found> {
    DataProvider::new(
        PEOPLE.to_vec(),
        |p: &Person| p.name,
        |p: &Person| Found::Person(format!("{} ({})", p.name, p.born)),
    )
    .with_name("people")
}

/// A producer-backed provider plus the number of times its source ran.
pub struct CountingProvider {
    pub provider: DataProvider<&'static str, Found>,
    pub calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[fixture]
pub fn comics() -> CountingProvider {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let provider = DataProvider::new(
        DataSource::producer(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            COMICS.to_vec()
        }),
        |title: &&'static str| *title,
        |title: &&'static str| Found::Comic((*title).to_string()),
    )
    .with_name("comics");
    CountingProvider { provider, calls }
}

/// A temporary directory holding catalogue files.
pub struct TempCatalogue {
    _temp: TempDir,
    root: PathBuf,
}

impl TempCatalogue {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes (or overwrites) a catalogue file and returns its path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(name);
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write catalogue '{}': {}", name, e));
        full_path
    }
}

impl Default for TempCatalogue {
    fn default() -> Self {
        Self::new()
    }
}
