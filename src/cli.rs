//! Command line interface over a TOML catalogue.

use anyhow::Context;
use clap::{ArgAction, Parser};
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::num::NonZeroUsize;

use crate::catalogue::{self, Catalogue, Hit};
use crate::config::SearchOptions;
use crate::search::{self, DEFAULT_CAPACITY, Provider, Query, QueryCache, ScoredValue};

#[derive(Debug, Parser)]
#[command(name = "relevance-search")]
#[command(about = "Fuzzy relevance search over a catalogue of records", long_about = None)]
pub struct Cli {
    /// Query to run. Reads one query per line from stdin when omitted.
    pub query: Option<String>,

    /// Catalogue file (defaults to <config dir>/relevance-search/catalogue.toml)
    #[arg(short, long, env = "RELEVANCE_SEARCH_CATALOGUE")]
    pub catalogue: Option<String>,

    /// Only show results scoring strictly above this
    #[arg(long, default_value_t = 0.0)]
    pub min_score: f64,

    /// Show at most this many results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Keep the engine's ascending order instead of best matches first
    #[arg(long)]
    pub ascending: bool,

    /// Print results as JSON, one array per query
    #[arg(long)]
    pub json: bool,

    /// Re-read the catalogue file on every search
    #[arg(long)]
    pub live: bool,

    /// Number of parsed queries kept when reading from stdin
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub cache_size: NonZeroUsize,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            excl_min_score: self.min_score,
            limit: self.limit,
        }
    }
}

/// Loads the catalogue and answers the query, or every stdin line without one.
pub fn run(cli: &Cli, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    let options = cli.options();
    options.validate()?;

    let path = catalogue::resolve_path(cli.catalogue.as_deref())
        .context("No catalogue given and no config directory available")?;

    let providers = if cli.live {
        Catalogue::live_providers(&path)?
    } else {
        let catalogue = Catalogue::load(&path)?;
        tracing::info!(
            path = %path.display(),
            collections = catalogue.collections.len(),
            records = catalogue.record_count(),
            "Loaded catalogue"
        );
        catalogue.providers()
    };
    let providers: Vec<&dyn Provider<Hit>> =
        providers.iter().map(|p| p as &dyn Provider<Hit>).collect();

    if let Some(raw) = &cli.query {
        let query = Query::new(raw);
        let results = search::search_with(&query, &providers, &options)?;
        return write_results(out, cli, &query, &results);
    }

    let cache = QueryCache::new(cli.cache_size);
    for line in input.lines() {
        let line = line.context("Failed to read query from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let query = cache.get_or_parse(&line);
        let results = search::search_with(&query, &providers, &options)?;
        write_results(out, cli, &query, &results)?;
    }
    Ok(())
}

fn write_results(
    out: &mut impl Write,
    cli: &Cli,
    query: &Query,
    results: &[ScoredValue<Hit>],
) -> anyhow::Result<()> {
    let rendered = if cli.json {
        render_json(results, cli.ascending)?
    } else {
        render_text(query, results, cli.ascending)
    };
    writeln!(out, "{}", rendered).context("Failed to write results")?;
    Ok(())
}

/// Results in display order: best first unless `ascending`.
fn ordered(results: &[ScoredValue<Hit>], ascending: bool) -> Vec<&ScoredValue<Hit>> {
    if ascending {
        results.iter().collect()
    } else {
        results.iter().rev().collect()
    }
}

pub fn render_json(results: &[ScoredValue<Hit>], ascending: bool) -> serde_json::Result<String> {
    serde_json::to_string(&ordered(results, ascending))
}

pub fn render_text(query: &Query, results: &[ScoredValue<Hit>], ascending: bool) -> String {
    if results.is_empty() {
        return format!("No results for '{}'", query);
    }

    let mut text = String::new();
    for (i, scored) in ordered(results, ascending).into_iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let _ = write!(text, "{:.3}  {}", scored.score, scored.value.collection);
        for (field, value) in &scored.value.record {
            let _ = write!(text, "  {}={:?}", field, value);
        }
    }
    text
}
