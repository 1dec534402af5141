//! The pair → film-set accumulator handed from the aggregator to the selector.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use super::pair::CollaboratorPair;

/// Mapping from each collaborator pair to the distinct films it occurred in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooccurrenceMap {
    entries: HashMap<CollaboratorPair, BTreeSet<String>>,
}

impl CooccurrenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `pair` co-occurred in `film_id`. Recording the same film
    /// twice is a no-op.
    pub fn record(&mut self, pair: CollaboratorPair, film_id: &str) {
        let films = self.entries.entry(pair).or_default();
        if !films.contains(film_id) {
            films.insert(film_id.to_string());
        }
    }

    /// Merges another shard into this one by film-set union.
    pub fn merge(&mut self, other: CooccurrenceMap) {
        for (pair, films) in other.entries {
            self.entries.entry(pair).or_default().extend(films);
        }
    }

    pub fn films(&self, pair: &CollaboratorPair) -> Option<&BTreeSet<String>> {
        self.entries.get(pair)
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CollaboratorPair, &BTreeSet<String>)> {
        self.entries.iter()
    }
}

impl FromIterator<(CollaboratorPair, String)> for CooccurrenceMap {
    fn from_iter<I: IntoIterator<Item = (CollaboratorPair, String)>>(iter: I) -> Self {
        let mut map = CooccurrenceMap::new();
        for (pair, film_id) in iter {
            map.record(pair, &film_id);
        }
        map
    }
}
