//! Normalized search queries.
//!
//! A [`Query`] is built once per request from raw user input and shared by every
//! provider scored against it.

use regex::Regex;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use super::scoring::relevance;

/// Runs of non-word characters (Unicode-aware) separate query tokens.
static WORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// A lower-cased search string together with its tokens.
///
/// Equality and hashing only consider [`Query::original`], so two queries built
/// from strings that lower-case to the same text are interchangeable.
#[derive(Debug, Clone)]
pub struct Query {
    original: String,
    words: Vec<String>,
    words_len: usize,
    /// Per-word share of `words_len`, in the same order as `words`.
    weights: Vec<f64>,
}

impl Query {
    /// Normalizes a raw search string. Never fails, whatever the input.
    pub fn new(raw: &str) -> Self {
        let original = raw.to_lowercase();
        let words: Vec<String> = tokenize(&original).map(str::to_owned).collect();
        let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
        let words_len: usize = lengths.iter().sum();
        let weights = lengths
            .iter()
            .map(|&len| len as f64 / words_len as f64)
            .collect();

        Self {
            original,
            words,
            words_len,
            weights,
        }
    }

    /// The lower-cased input string, used for the whole-query substring match.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Non-empty lower-case tokens, in input order. Repeated tokens are kept.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Sum of the character lengths of [`Query::words`].
    pub const fn words_len(&self) -> usize {
        self.words_len
    }

    /// A query is empty when it has no tokens, even if the original text is not.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Tokens paired with their length weight `len(word) / words_len`.
    pub(crate) fn weighted_words(&self) -> impl Iterator<Item = (&str, f64)> {
        self.words
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Scores already lower-cased field values against this query.
    ///
    /// See [`relevance`](super::scoring::relevance) for the formula.
    pub fn score<S: AsRef<str>>(&self, field_values: &[S]) -> f64 {
        relevance(self, field_values)
    }
}

/// Splits lower-cased text on runs of non-word characters, dropping empty pieces.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    WORD_SEPARATOR.split(text).filter(|word| !word.is_empty())
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.original.hash(state);
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl FromStr for Query {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
