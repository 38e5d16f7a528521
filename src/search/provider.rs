//! Data providers: one searchable content source each.
//!
//! A [`DataProvider`] binds a record source to a field-key function (what gets
//! matched) and a convert function (what gets returned). Providers over different
//! record types meet at the [`Provider`] trait so they can be searched together.

use std::fmt;

use super::query::Query;
use super::scoring::ScoredValue;
use crate::error::{Result, SearchError};

type KeyFn<T> = Box<dyn Fn(&T) -> anyhow::Result<Fields> + Send + Sync>;
type ConvertFn<T, U> = Box<dyn Fn(&T) -> anyhow::Result<U> + Send + Sync>;
type ProducerFn<T> = Box<dyn Fn() -> anyhow::Result<Vec<T>> + Send + Sync>;

/// Lazy sequence of scored results produced by one provider.
pub type ScoredIter<'a, U> = Box<dyn Iterator<Item = Result<ScoredValue<U>>> + 'a>;

/// A searchable content source producing results of type `U`.
pub trait Provider<U> {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Scores every record against `query`, yielding only those scoring strictly
    /// above `excl_min_score`.
    ///
    /// Fails up front if the records cannot be obtained. Record-level failures
    /// arrive as `Err` items.
    fn search<'a>(&'a self, query: &'a Query, excl_min_score: f64) -> Result<ScoredIter<'a, U>>;
}

/// The searchable strings extracted from one record.
///
/// A single string is a one-element field list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-cases every field value, which is the only form ever scored.
    pub fn into_lowercase(self) -> Vec<String> {
        self.0.into_iter().map(|value| value.to_lowercase()).collect()
    }
}

impl From<String> for Fields {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for Fields {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<&String> for Fields {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl From<Vec<String>> for Fields {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(values: Vec<&str>) -> Self {
        values.into_iter().collect()
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Fields {
    fn from(values: [S; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Fields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Where a provider's records come from.
pub enum DataSource<T> {
    /// A snapshot, scored as-is on every search.
    Fixed(Vec<T>),
    /// Invoked once per search and never cached, for live data.
    Producer(ProducerFn<T>),
}

impl<T> DataSource<T> {
    pub const fn fixed(records: Vec<T>) -> Self {
        Self::Fixed(records)
    }

    pub fn producer<F>(produce: F) -> Self
    where
        T: 'static,
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        Self::Producer(Box::new(move || -> anyhow::Result<Vec<T>> { Ok(produce()) }))
    }

    /// A producer that may fail, e.g. because it performs I/O.
    pub fn try_producer<F>(produce: F) -> Self
    where
        F: Fn() -> anyhow::Result<Vec<T>> + Send + Sync + 'static,
    {
        Self::Producer(Box::new(produce))
    }
}

impl<T> From<Vec<T>> for DataSource<T> {
    fn from(records: Vec<T>) -> Self {
        Self::Fixed(records)
    }
}

impl<T> fmt::Debug for DataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(records) => f.debug_tuple("Fixed").field(&records.len()).finish(),
            Self::Producer(_) => f.write_str("Producer"),
        }
    }
}

/// What a provider does when a fallible key or convert function fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordErrorPolicy {
    /// Yield the error; [`search`](super::search) stops at the first one.
    #[default]
    Abort,
    /// Log the failure at warn level and leave the record out.
    Skip,
}

/// A provider over records of type `T` returning results of type `U`.
pub struct DataProvider<T, U> {
    name: String,
    source: DataSource<T>,
    key: KeyFn<T>,
    convert: ConvertFn<T, U>,
    on_record_error: RecordErrorPolicy,
}

impl<T: 'static, U: 'static> DataProvider<T, U> {
    /// Builds a provider from infallible key and convert functions.
    ///
    /// Key functions return owned strings: a `String`, a `Vec<String>` or an array.
    pub fn new<K, F, C>(source: impl Into<DataSource<T>>, key: K, convert: C) -> Self
    where
        K: Fn(&T) -> F + Send + Sync + 'static,
        F: Into<Fields> + 'static,
        C: Fn(&T) -> U + Send + Sync + 'static,
    {
        Self::from_parts(
            source.into(),
            Box::new(move |record: &T| -> anyhow::Result<Fields> { Ok(key(record).into()) }),
            Box::new(move |record: &T| -> anyhow::Result<U> { Ok(convert(record)) }),
        )
    }

    /// Builds a provider whose key or convert function can fail per record.
    ///
    /// Failures follow the provider's [`RecordErrorPolicy`], `Abort` unless
    /// changed with [`DataProvider::on_record_error`].
    pub fn try_new<K, F, C>(source: impl Into<DataSource<T>>, key: K, convert: C) -> Self
    where
        K: Fn(&T) -> anyhow::Result<F> + Send + Sync + 'static,
        F: Into<Fields> + 'static,
        C: Fn(&T) -> anyhow::Result<U> + Send + Sync + 'static,
    {
        Self::from_parts(
            source.into(),
            Box::new(move |record: &T| -> anyhow::Result<Fields> { key(record).map(Into::into) }),
            Box::new(convert),
        )
    }

    fn from_parts(source: DataSource<T>, key: KeyFn<T>, convert: ConvertFn<T, U>) -> Self {
        Self {
            name: std::any::type_name::<T>().to_string(),
            source,
            key,
            convert,
            on_record_error: RecordErrorPolicy::default(),
        }
    }
}

impl<T, U> DataProvider<T, U> {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn on_record_error(mut self, policy: RecordErrorPolicy) -> Self {
        self.on_record_error = policy;
        self
    }

    pub const fn record_error_policy(&self) -> RecordErrorPolicy {
        self.on_record_error
    }

    pub const fn source(&self) -> &DataSource<T> {
        &self.source
    }

    /// Scores one record; `Ok(None)` when it does not clear `excl_min_score`
    /// or was skipped after a failure.
    fn score_record(
        &self,
        record: &T,
        query: &Query,
        excl_min_score: f64,
    ) -> Result<Option<ScoredValue<U>>> {
        let fields = match (self.key)(record) {
            Ok(fields) => fields.into_lowercase(),
            Err(err) => return self.record_failed(err),
        };

        let score = query.score(fields.as_slice());
        if score <= excl_min_score {
            return Ok(None);
        }

        match (self.convert)(record) {
            Ok(value) => Ok(Some(ScoredValue::new(score, value))),
            Err(err) => self.record_failed(err),
        }
    }

    fn record_failed(&self, err: anyhow::Error) -> Result<Option<ScoredValue<U>>> {
        match self.on_record_error {
            RecordErrorPolicy::Abort => Err(SearchError::Record {
                provider: self.name.clone(),
                source: err,
            }),
            RecordErrorPolicy::Skip => {
                let error = format!("{err:#}");
                tracing::warn!(provider = %self.name, %error, "skipping record");
                Ok(None)
            }
        }
    }
}

impl<T, U> Provider<U> for DataProvider<T, U> {
    fn name(&self) -> &str {
        &self.name
    }

    fn search<'a>(&'a self, query: &'a Query, excl_min_score: f64) -> Result<ScoredIter<'a, U>> {
        match &self.source {
            DataSource::Fixed(records) => Ok(Box::new(records.iter().filter_map(
                move |record| self.score_record(record, query, excl_min_score).transpose(),
            ))),
            DataSource::Producer(produce) => {
                tracing::trace!(provider = %self.name, "invoking data source");
                let records = produce().map_err(|source| SearchError::Source {
                    provider: self.name.clone(),
                    source,
                })?;
                Ok(Box::new(records.into_iter().filter_map(move |record| {
                    self.score_record(&record, query, excl_min_score)
                        .transpose()
                })))
            }
        }
    }
}

impl<T, U> fmt::Debug for DataProvider<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProvider")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("on_record_error", &self.on_record_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn titles() -> DataProvider<String, String> {
        DataProvider::new(
            vec!["Kangaroo Soundboard".to_string(), "Comic Strip".to_string()],
            String::clone,
            String::clone,
        )
    }

    fn collect<U>(provider: &dyn Provider<U>, query: &str, min: f64) -> Vec<ScoredValue<U>> {
        let query = Query::new(query);
        provider
            .search(&query, min)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_fields_from_single_string() {
        check!(Fields::from("One").as_slice() == ["One".to_string()]);
        check!(Fields::from(String::from("One")).len() == 1);
    }

    #[test]
    fn test_fields_lowercase() {
        let fields = Fields::from(["Kangaroo", "SOUNDBOARD"]);
        check!(fields.into_lowercase() == vec!["kangaroo", "soundboard"]);
    }

    #[test]
    fn test_substring_match_kept_and_zero_excluded() {
        let results = collect(&titles(), "kangaroo", 0.0);
        check!(results.len() == 1);
        check!(results[0].score == 1.0);
        check!(results[0].value == "Kangaroo Soundboard");
    }

    #[test]
    fn test_min_score_is_exclusive() {
        // "board strip" splits into two equal-weight words, one per record.
        let halves = collect(&titles(), "board strip", 0.0);
        check!(halves.len() == 2);
        check!(halves.iter().all(|r| r.score == 0.5));

        check!(collect(&titles(), "board strip", 0.5).is_empty());
        check!(collect(&titles(), "strip", 0.999).len() == 1);
    }

    #[test]
    fn test_empty_query_matches_every_record() {
        let results = collect(&titles(), "", 0.0);
        check!(results.len() == 2);
        check!(results.iter().all(|r| r.score == 1.0));
    }

    #[test]
    fn test_producer_invoked_once_per_search() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = DataProvider::new(
            DataSource::producer(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                vec![format!("generation {n}")]
            }),
            String::clone,
            String::clone,
        );

        check!(collect(&provider, "generation 0", 0.0).len() == 1);
        check!(collect(&provider, "generation 1", 0.0).len() == 1);
        // Only the word "generation" matches now, which scores 10/11.
        check!(collect(&provider, "generation 0", 0.95).is_empty());
        check!(calls.load(Ordering::SeqCst) == 3);
    }

    #[test]
    fn test_failing_producer_reports_provider() {
        let provider: DataProvider<String, String> = DataProvider::new(
            DataSource::try_producer(|| anyhow::bail!("backend offline")),
            String::clone,
            String::clone,
        )
        .with_name("quotes");

        let query = Query::new("anything");
        let err = provider.search(&query, 0.0).err().unwrap();
        check!(matches!(err, SearchError::Source { .. }));
        check!(err.provider() == Some("quotes"));
    }

    #[test]
    fn test_convert_only_runs_for_kept_records() {
        let conversions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&conversions);
        let provider = DataProvider::new(
            vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()],
            String::clone,
            move |s: &String| {
                counter.fetch_add(1, Ordering::SeqCst);
                s.len()
            },
        );

        let results = collect(&provider, "beta", 0.0);
        check!(results.len() == 1);
        check!(results[0].value == 4);
        check!(conversions.load(Ordering::SeqCst) == 1);
    }

    fn fallible(policy: RecordErrorPolicy) -> DataProvider<(u32, Option<&'static str>), u32> {
        DataProvider::try_new(
            vec![(1, Some("first quote")), (2, None), (3, Some("third quote"))],
            |(id, text): &(u32, Option<&'static str>)| {
                text.map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("record {id} has no text"))
            },
            |(id, _): &(u32, Option<&'static str>)| Ok(*id),
        )
        .with_name("quotes")
        .on_record_error(policy)
    }

    #[test]
    fn test_abort_policy_yields_error() {
        let provider = fallible(RecordErrorPolicy::Abort);
        check!(provider.record_error_policy() == RecordErrorPolicy::Abort);

        let query = Query::new("quote");
        let items: Vec<_> = provider.search(&query, 0.0).unwrap().collect();
        check!(items.len() == 3);
        check!(items[0].is_ok());
        check!(matches!(items[1], Err(SearchError::Record { .. })));
        check!(items[2].is_ok());

        let collected: Result<Vec<_>> = provider.search(&query, 0.0).unwrap().collect();
        check!(collected.is_err());
    }

    #[test]
    fn test_skip_policy_keeps_other_records() {
        let provider = fallible(RecordErrorPolicy::Skip);
        let ids: Vec<u32> = collect(&provider, "quote", 0.0)
            .into_iter()
            .map(ScoredValue::into_value)
            .collect();
        check!(ids == vec![1, 3]);
    }

    #[test]
    fn test_default_name_is_record_type() {
        check!(titles().name() == "alloc::string::String");
        check!(titles().with_name("titles").name() == "titles");
    }

    #[test]
    fn test_debug_hides_closures() {
        let debug = format!("{:?}", titles().with_name("titles"));
        check!(debug.contains("titles"));
        check!(debug.contains("Fixed(2)"));
    }
}
