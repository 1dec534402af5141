// In: src/pairing/aggregator.rs

//! The streaming aggregator.
//!
//! Credit records arrive one at a time (or one Arrow batch at a time) and are
//! grouped into films by watching for a change of film id. The input contract
//! is **contiguity**: every record of a film must appear in one unbroken run.
//! The stream need not be sorted by film id. When a run ends, the buffered
//! group is handed to the extractor and the resulting pairs are folded into the
//! `CooccurrenceMap`; nothing else about the film is retained.
//!
//! A film id that shows up again after its run was closed breaks the
//! contiguity contract. The aggregator never aborts on it; the configured
//! `ReopenedFilmPolicy` decides whether the late records are merged (with a
//! warning) or discarded.

use arrow::record_batch::{RecordBatch, RecordBatchReader};
use hashbrown::HashSet;
use serde::Serialize;

use super::extractor::extract_pairs;
use super::map::CooccurrenceMap;
use super::registry::RolePattern;
use crate::config::ReopenedFilmPolicy;
use crate::error::Result;
use crate::source::credits::CreditColumns;
use crate::types::CreditRecord;

/// The caller-supplied set of film ids eligible for aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmWhitelist {
    ids: HashSet<String>,
}

impl FilmWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, film_id: impl Into<String>) {
        self.ids.insert(film_id.into());
    }

    pub fn contains(&self, film_id: &str) -> bool {
        self.ids.contains(film_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FilmWhitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Counters describing one aggregation pass.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub batches: u64,
    pub records_seen: u64,
    pub records_outside_whitelist: u64,
    pub malformed_skipped: u64,
    pub films_closed: u64,
    pub films_reopened: u64,
    pub records_rejected: u64,
}

/// What a finished pass hands back to the caller.
#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    pub map: CooccurrenceMap,
    pub stats: AggregationStats,
}

/// Film boundary detection state.
#[derive(Debug)]
enum FilmBoundary {
    NoFilmOpen,
    FilmOpen {
        film_id: String,
        group: Vec<CreditRecord>,
    },
    /// A closed film reappeared under `ReopenedFilmPolicy::Reject`; its records
    /// are dropped until the id changes again.
    Rejected { film_id: String },
}

impl FilmBoundary {
    fn current_film(&self) -> Option<&str> {
        match self {
            FilmBoundary::NoFilmOpen => None,
            FilmBoundary::FilmOpen { film_id, .. } | FilmBoundary::Rejected { film_id } => {
                Some(film_id)
            }
        }
    }
}

/// Accumulates collaborator pairs over a single pass of the credit stream.
///
/// Created at the start of a pass, fed with `push`/`consume_batch`, and turned
/// into a read-only `AggregationOutcome` by `finish`, which also flushes the
/// last open film.
///
/// Besides the map, memory is bounded by the whitelist size: only whitelisted
/// film ids are ever remembered as closed, plus one open film's group.
pub struct PairAggregator<'w> {
    pattern: RolePattern,
    whitelist: &'w FilmWhitelist,
    policy: ReopenedFilmPolicy,
    boundary: FilmBoundary,
    closed_films: HashSet<String>,
    map: CooccurrenceMap,
    stats: AggregationStats,
}

impl<'w> PairAggregator<'w> {
    pub fn new(pattern: RolePattern, whitelist: &'w FilmWhitelist, policy: ReopenedFilmPolicy) -> Self {
        Self {
            pattern,
            whitelist,
            policy,
            boundary: FilmBoundary::NoFilmOpen,
            closed_films: HashSet::new(),
            map: CooccurrenceMap::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Feeds one record.
    pub fn push(&mut self, record: CreditRecord) {
        self.stats.records_seen += 1;

        if !self.whitelist.contains(&record.film_id) {
            self.stats.records_outside_whitelist += 1;
            return;
        }

        if self.boundary.current_film() != Some(record.film_id.as_str()) {
            self.close_open_film();
            self.open_film(&record.film_id);
        }

        match &mut self.boundary {
            FilmBoundary::FilmOpen { group, .. } => {
                if self.pattern.admits(record.role) {
                    group.push(record);
                }
            }
            FilmBoundary::Rejected { .. } => self.stats.records_rejected += 1,
            FilmBoundary::NoFilmOpen => {}
        }
    }

    /// Counts a row that could not be decoded into a `CreditRecord`.
    pub fn push_malformed(&mut self) {
        self.stats.records_seen += 1;
        self.stats.malformed_skipped += 1;
    }

    /// Feeds every row of an Arrow batch, skipping (and counting) malformed rows.
    pub fn consume_batch(&mut self, batch: &RecordBatch, columns: &CreditColumns) -> Result<()> {
        self.stats.batches += 1;
        for decoded in columns.decode(batch)? {
            match decoded {
                Ok(record) => self.push(record),
                Err(err) => {
                    log::debug!("Skipping credit row: {}", err);
                    self.push_malformed();
                }
            }
        }
        Ok(())
    }

    /// The map built so far. Films still open are not included.
    pub fn map(&self) -> &CooccurrenceMap {
        &self.map
    }

    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    /// Flushes the last open film and returns the accumulated result.
    pub fn finish(mut self) -> AggregationOutcome {
        self.close_open_film();

        log_metric!(
            "event" = "aggregation_finished",
            "pattern" = self.pattern,
            "pairs" = self.map.len(),
            "films_closed" = self.stats.films_closed,
            "records_seen" = self.stats.records_seen,
            "malformed_skipped" = self.stats.malformed_skipped,
            "films_reopened" = self.stats.films_reopened,
        );

        AggregationOutcome {
            map: self.map,
            stats: self.stats,
        }
    }

    fn open_film(&mut self, film_id: &str) {
        if !self.closed_films.contains(film_id) {
            self.boundary = FilmBoundary::FilmOpen {
                film_id: film_id.to_string(),
                group: Vec::new(),
            };
            return;
        }

        self.stats.films_reopened += 1;
        match self.policy {
            ReopenedFilmPolicy::Warn => {
                log::warn!(
                    "Film {} reappeared after its credits were closed; input is not contiguous by film",
                    film_id
                );
                self.boundary = FilmBoundary::FilmOpen {
                    film_id: film_id.to_string(),
                    group: Vec::new(),
                };
            }
            ReopenedFilmPolicy::Reject => {
                log::warn!(
                    "Film {} reappeared after its credits were closed; discarding the late records",
                    film_id
                );
                self.boundary = FilmBoundary::Rejected {
                    film_id: film_id.to_string(),
                };
            }
        }
    }

    fn close_open_film(&mut self) {
        match std::mem::replace(&mut self.boundary, FilmBoundary::NoFilmOpen) {
            FilmBoundary::FilmOpen { film_id, group } => {
                for pair in extract_pairs(&group, &self.pattern) {
                    self.map.record(pair, &film_id);
                }
                self.stats.films_closed += 1;
                self.closed_films.insert(film_id);
            }
            FilmBoundary::Rejected { .. } | FilmBoundary::NoFilmOpen => {}
        }
    }
}

/// Aggregates an in-memory or lazily produced record sequence.
///
/// Reappearing films are merged with a warning.
pub fn aggregate<I>(records: I, pattern: RolePattern, whitelist: &FilmWhitelist) -> CooccurrenceMap
where
    I: IntoIterator<Item = CreditRecord>,
{
    let mut aggregator = PairAggregator::new(pattern, whitelist, ReopenedFilmPolicy::Warn);
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish().map
}

/// Aggregates an Arrow batch stream of `(tconst, nconst, category)` rows.
///
/// Only the current batch, the open film's group and the closed whitelisted
/// ids are held in memory besides the result map.
pub fn aggregate_batches(
    reader: &mut dyn RecordBatchReader,
    pattern: RolePattern,
    whitelist: &FilmWhitelist,
    policy: ReopenedFilmPolicy,
) -> Result<AggregationOutcome> {
    let schema = reader.schema();
    let columns = CreditColumns::resolve(&schema)?;
    let mut aggregator = PairAggregator::new(pattern, whitelist, policy);

    for batch_result in reader {
        let batch = batch_result?;
        aggregator.consume_batch(&batch, &columns)?;
        log::debug!(
            "batch {} consumed: {} records seen, {} pairs so far",
            aggregator.stats().batches,
            aggregator.stats().records_seen,
            aggregator.map().len()
        );
    }

    Ok(aggregator.finish())
}
