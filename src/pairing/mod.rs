//! This module is the collaboration pair engine: the pattern registry, the
//! per-film pair extractor, the streaming aggregator, and the top-N selector.
//! It works on plain `CreditRecord`s; the only Arrow-aware entry point is
//! `aggregate_batches`, which decodes batches through `source::credits`.

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod aggregator;
pub mod extractor;
pub mod map;
pub mod pair;
pub mod registry;
pub mod selector;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::aggregator::{
    aggregate, aggregate_batches, AggregationOutcome, AggregationStats, FilmWhitelist,
    PairAggregator,
};
pub use self::extractor::extract_pairs;
pub use self::map::CooccurrenceMap;
pub use self::pair::{CollaboratorPair, Credit};
pub use self::registry::{pattern_for, registered_patterns, RolePattern, PATTERN_COUNT};
pub use self::selector::{select_top, select_up_to, RankedPair};
