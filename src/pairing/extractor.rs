// In: src/pairing/extractor.rs

use std::collections::BTreeSet;

use super::pair::{CollaboratorPair, Credit};
use super::registry::RolePattern;
use crate::types::CreditRecord;

/// Produces every collaborator pair in one film's credit group that matches
/// `pattern`.
///
/// Records whose role the pattern does not name are ignored. The remaining
/// credits are sorted by person id and de-duplicated, then every unordered
/// 2-combination whose role multiset equals the pattern is kept. Fewer than two
/// qualifying credits yields an empty set.
pub fn extract_pairs(group: &[CreditRecord], pattern: &RolePattern) -> BTreeSet<CollaboratorPair> {
    let credits: BTreeSet<Credit> = group
        .iter()
        .filter(|record| pattern.admits(record.role))
        .map(Credit::from)
        .collect();

    let mut pairs = BTreeSet::new();
    if credits.len() < 2 {
        return pairs;
    }

    // `BTreeSet` iteration is already in canonical (person id) order.
    let sorted: Vec<&Credit> = credits.iter().collect();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            if let Some(pair) = CollaboratorPair::try_new((*a).clone(), (*b).clone(), pattern) {
                pairs.insert(pair);
            }
        }
    }
    pairs
}
