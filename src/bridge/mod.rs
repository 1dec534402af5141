// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of costar. It wires the pure `pairing`
// engine to the `source` tables and turns selected pairs into displayable output.
//
// Data Flow:
//
//   1. [Search (find_top_pairs / run_pair_search)] -> Receives a PairQuery + table readers
//         |
//         `-> a. `query.validate()` rejects bad choices/bounds before any I/O
//         |
//         `-> b. `FilmCatalog` -> `FilmWhitelist`
//         |
//         `-> c. credit `RecordBatch` stream -> `pairing::aggregate_batches`
//                                              -> `CooccurrenceMap`
//         |
//         `-> d. `pairing::select_top` -> `Vec<RankedPair>`
//
//   2. [Enricher (enrich)] -> Resolves ids through `FilmLookup`/`PersonLookup`,
//                             degrading unknown ids to placeholders
//
//   3. [Report (render_report)] -> Text for the terminal (the CLI also offers JSON)
//
// ====================================================================================
pub mod enricher;
pub mod report;
pub mod search;

// --- Engine Operations ---
pub use crate::pairing::{aggregate, pattern_for, select_top};

// --- Enrichment & Rendering ---
pub use enricher::{enrich, referenced_people, EnrichedFilm, EnrichedMember, EnrichedPair, EnrichedResult, UnresolvedRef};
pub use report::render_report;

// --- End-to-End Search ---
pub use search::{find_top_pairs, run_pair_search, PairSearch, Shortfall};

#[cfg(test)]
mod tests;
