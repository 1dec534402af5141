// In: src/bridge/enricher.rs

//! Resolves the ids in a selected result to display names and titles.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{CostarError, ReferenceKind};
use crate::pairing::{Credit, RankedPair};
use crate::source::{FilmLookup, PersonLookup};
use crate::types::Role;

/// An id that could not be resolved in its lookup table.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef {
    pub kind: ReferenceKind,
    pub id: String,
}

impl UnresolvedRef {
    pub fn to_error(&self) -> CostarError {
        CostarError::UnresolvedReference {
            kind: self.kind,
            id: self.id.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMember {
    pub person_id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EnrichedFilm {
    pub film_id: String,
    pub display: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPair {
    pub members: [EnrichedMember; 2],
    pub films: Vec<EnrichedFilm>,
    /// References that fell back to a placeholder.
    pub unresolved: Vec<UnresolvedRef>,
}

impl EnrichedPair {
    pub fn film_count(&self) -> usize {
        self.films.len()
    }

    /// The unresolved references of this pair as errors, for reporting.
    pub fn errors(&self) -> impl Iterator<Item = CostarError> + '_ {
        self.unresolved.iter().map(UnresolvedRef::to_error)
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedResult {
    pub pairs: Vec<EnrichedPair>,
}

impl EnrichedResult {
    pub fn unresolved_count(&self) -> usize {
        self.pairs.iter().map(|p| p.unresolved.len()).sum()
    }
}

/// Every person id referenced by `selected`.
pub fn referenced_people(selected: &[RankedPair]) -> BTreeSet<String> {
    selected
        .iter()
        .flat_map(|ranked| ranked.pair.members())
        .map(|credit| credit.person_id.clone())
        .collect()
}

/// Resolves every id in `selected`. Missing ids never abort the result; they
/// become placeholders and are listed in the pair's `unresolved`.
pub fn enrich<F, P>(selected: &[RankedPair], films: &F, persons: &P) -> EnrichedResult
where
    F: FilmLookup + ?Sized,
    P: PersonLookup + ?Sized,
{
    let pairs = selected
        .iter()
        .map(|ranked| enrich_pair(ranked, films, persons))
        .collect();
    EnrichedResult { pairs }
}

fn enrich_pair<F, P>(ranked: &RankedPair, films: &F, persons: &P) -> EnrichedPair
where
    F: FilmLookup + ?Sized,
    P: PersonLookup + ?Sized,
{
    let mut unresolved = Vec::new();
    let members = [
        enrich_member(ranked.pair.first(), persons, &mut unresolved),
        enrich_member(ranked.pair.second(), persons, &mut unresolved),
    ];

    let film_entries = ranked
        .films
        .iter()
        .map(|film_id| {
            let display = match films.film(film_id) {
                Some(film) => film.display(),
                None => {
                    unresolved.push(UnresolvedRef {
                        kind: ReferenceKind::Film,
                        id: film_id.clone(),
                    });
                    format!("<unknown film {}>", film_id)
                }
            };
            EnrichedFilm {
                film_id: film_id.clone(),
                display,
            }
        })
        .collect();

    if !unresolved.is_empty() {
        log::warn!(
            "{} reference(s) of pair {} could not be resolved",
            unresolved.len(),
            ranked.pair
        );
    }

    EnrichedPair {
        members,
        films: film_entries,
        unresolved,
    }
}

fn enrich_member<P>(credit: &Credit, persons: &P, unresolved: &mut Vec<UnresolvedRef>) -> EnrichedMember
where
    P: PersonLookup + ?Sized,
{
    let name = match persons.person_name(&credit.person_id) {
        Some(name) => name.to_string(),
        None => {
            unresolved.push(UnresolvedRef {
                kind: ReferenceKind::Person,
                id: credit.person_id.clone(),
            });
            format!("<unknown person {}>", credit.person_id)
        }
    };
    EnrichedMember {
        person_id: credit.person_id.clone(),
        name,
        role: credit.role,
    }
}
