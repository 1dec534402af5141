// In: src/bridge/search.rs

use std::fs::File;
use std::io::Read;

use serde::Serialize;

use super::enricher::{enrich, referenced_people, EnrichedResult};
use crate::config::CostarConfig;
use crate::error::Result;
use crate::pairing::{
    aggregate_batches, select_up_to, AggregationStats, CooccurrenceMap, RankedPair, RolePattern,
};
use crate::query::PairQuery;
use crate::source::{open_credit_stream, FilmCatalog, PersonIndex};

/// Fewer distinct pairs existed than were requested.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub requested: usize,
    pub available: usize,
}

/// Everything one end-to-end search produced.
#[derive(Serialize, Debug, Clone)]
pub struct PairSearch {
    pub pattern: RolePattern,
    pub films_in_window: usize,
    pub stats: AggregationStats,
    pub distinct_pairs: usize,
    /// Set when the map held fewer pairs than requested; `result` then holds
    /// all of them.
    pub shortfall: Option<Shortfall>,
    pub result: EnrichedResult,
}

/// Runs a search against the working tables named in `config`.
///
/// The query is validated before any file is opened.
pub fn find_top_pairs(query: &PairQuery, config: &CostarConfig) -> Result<PairSearch> {
    query.validate()?;
    config.validate()?;

    let films = File::open(&config.data.films)?;
    let credits = File::open(&config.data.credits)?;
    let persons = File::open(&config.data.persons)?;
    run_pair_search(query, config, films, credits, persons)
}

/// Runs a search over arbitrary table readers.
///
/// Steps: validate the query, index the film table and derive the whitelist,
/// stream the credit table through the aggregator, select the top pairs, then
/// load just the person names those pairs need and enrich.
pub fn run_pair_search<F, C, P>(
    query: &PairQuery,
    config: &CostarConfig,
    films: F,
    credits: C,
    persons: P,
) -> Result<PairSearch>
where
    F: Read,
    C: Read,
    P: Read,
{
    let validated = query.validate()?;
    let batch_size = config.batch_size_rows;

    let catalog = FilmCatalog::load(films, batch_size)?;
    let whitelist = catalog.whitelist(&validated.filter);
    log::info!(
        "{} of {} films fall inside the rating/year window",
        whitelist.len(),
        catalog.len()
    );

    let mut reader = open_credit_stream(credits, batch_size)?;
    let outcome = aggregate_batches(
        &mut reader,
        validated.pattern,
        &whitelist,
        config.reopened_films,
    )?;
    log::info!(
        "Aggregated {} credit records into {} distinct {} pairs ({} malformed rows skipped)",
        outcome.stats.records_seen,
        outcome.map.len(),
        validated.pattern,
        outcome.stats.malformed_skipped
    );

    let (selected, shortfall) = select_with_shortfall(&outcome.map, validated.result_count)?;

    let people = referenced_people(&selected);
    let person_index = PersonIndex::load_for(persons, batch_size, &people)?;
    let result = enrich(&selected, &catalog, &person_index);

    Ok(PairSearch {
        pattern: validated.pattern,
        films_in_window: whitelist.len(),
        stats: outcome.stats,
        distinct_pairs: outcome.map.len(),
        shortfall,
        result,
    })
}

/// Selects up to `n` pairs in one ranking pass, reporting a shortfall when the
/// map holds fewer.
fn select_with_shortfall(
    map: &CooccurrenceMap,
    n: usize,
) -> Result<(Vec<RankedPair>, Option<Shortfall>)> {
    let available = map.len();
    let shortfall = (n > available).then_some(Shortfall {
        requested: n,
        available,
    });
    if shortfall.is_some() {
        log::warn!(
            "Requested {} pairs but only {} exist; reporting what was found",
            n,
            available
        );
    }
    Ok((select_up_to(map, n)?, shortfall))
}
