// In: src/pairing/selector.rs

use std::cmp::Reverse;

use serde::Serialize;

use super::map::CooccurrenceMap;
use super::pair::CollaboratorPair;
use crate::error::CostarError;

/// One selected pair and the films it co-occurred in (sorted by film id).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RankedPair {
    pub pair: CollaboratorPair,
    pub films: Vec<String>,
}

impl RankedPair {
    pub fn count(&self) -> usize {
        self.films.len()
    }
}

/// Returns the `n` pairs with the most distinct films, most first.
///
/// Ties are broken by the canonical pair ordering so the result is
/// deterministic. The map is only read. Asking for more pairs than the map
/// holds fails with `InsufficientResults`; asking for zero fails with
/// `InvalidResultCount`.
pub fn select_top(map: &CooccurrenceMap, n: usize) -> Result<Vec<RankedPair>, CostarError> {
    if n > map.len() && n > 0 {
        return Err(CostarError::InsufficientResults {
            requested: n,
            available: map.len(),
        });
    }
    select_up_to(map, n)
}

/// Like `select_top`, but returns every pair when the map holds fewer than
/// `n`.
pub fn select_up_to(map: &CooccurrenceMap, n: usize) -> Result<Vec<RankedPair>, CostarError> {
    if n == 0 {
        return Err(CostarError::InvalidResultCount(n));
    }

    let mut ranked: Vec<_> = map.iter().collect();
    ranked.sort_by(|(pair_a, films_a), (pair_b, films_b)| {
        (Reverse(films_a.len()), *pair_a).cmp(&(Reverse(films_b.len()), *pair_b))
    });

    let selected: Vec<RankedPair> = ranked
        .into_iter()
        .take(n)
        .map(|(pair, films)| RankedPair {
            pair: pair.clone(),
            films: films.iter().cloned().collect(),
        })
        .collect();

    log_metric!(
        "event" = "select_top",
        "requested" = n,
        "available" = map.len(),
        "best_count" = selected.first().map_or(0, RankedPair::count),
    );

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::pair::Credit;
    use crate::pairing::registry::pattern_for;
    use crate::types::Role;

    fn pair(director: &str, actor: &str) -> CollaboratorPair {
        CollaboratorPair::try_new(
            Credit::new(director, Role::Director),
            Credit::new(actor, Role::Actor),
            &pattern_for(4).unwrap(),
        )
        .unwrap()
    }

    fn sample_map() -> CooccurrenceMap {
        vec![
            (pair("nm1", "nm2"), "tt1".to_string()),
            (pair("nm1", "nm2"), "tt2".to_string()),
            (pair("nm1", "nm3"), "tt3".to_string()),
            (pair("nm4", "nm5"), "tt1".to_string()),
            (pair("nm4", "nm5"), "tt2".to_string()),
            (pair("nm4", "nm5"), "tt4".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_select_top_orders_by_film_count() {
        let top = select_top(&sample_map(), 3).unwrap();
        let counts: Vec<usize> = top.iter().map(RankedPair::count).collect();
        assert_eq!(counts, vec![3, 2, 1]);
        assert_eq!(top[0].pair, pair("nm4", "nm5"));
        assert_eq!(top[0].films, vec!["tt1", "tt2", "tt4"]);
    }

    #[test]
    fn test_select_top_breaks_ties_by_pair() {
        let map: CooccurrenceMap = vec![
            (pair("nm9", "nm8"), "tt1".to_string()),
            (pair("nm1", "nm2"), "tt1".to_string()),
        ]
        .into_iter()
        .collect();
        let top = select_top(&map, 2).unwrap();
        assert_eq!(top[0].pair, pair("nm1", "nm2"));
    }

    #[test]
    fn test_select_up_to_caps_at_available_pairs() {
        let map = sample_map();
        let all = select_up_to(&map, 10).unwrap();
        assert_eq!(all, select_top(&map, 3).unwrap());
        assert_eq!(select_up_to(&map, 2).unwrap(), select_top(&map, 2).unwrap());
        assert!(matches!(
            select_up_to(&map, 0),
            Err(CostarError::InvalidResultCount(0))
        ));
    }

    #[test]
    fn test_select_top_does_not_consume_map() {
        let map = sample_map();
        let before = map.clone();
        let _ = select_top(&map, 1).unwrap();
        assert_eq!(map, before);
    }

    #[test]
    fn test_select_top_rejects_more_than_available() {
        let err = select_top(&sample_map(), 4).unwrap_err();
        assert!(matches!(
            err,
            CostarError::InsufficientResults {
                requested: 4,
                available: 3
            }
        ));
        assert!(err.is_recoverable());
        assert!(matches!(
            select_top(&sample_map(), 0),
            Err(CostarError::InvalidResultCount(0))
        ));
    }
}
