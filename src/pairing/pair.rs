//! Canonical collaborator pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::registry::RolePattern;
use crate::types::{CreditRecord, Role};

/// One side of a pair: a person and the role they held on the film.
///
/// Ordering is by `person_id` first, so sorting credits yields the canonical
/// iteration order used by the extractor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credit {
    pub person_id: String,
    pub role: Role,
}

impl Credit {
    pub fn new(person_id: impl Into<String>, role: Role) -> Self {
        Self {
            person_id: person_id.into(),
            role,
        }
    }
}

impl From<&CreditRecord> for Credit {
    fn from(record: &CreditRecord) -> Self {
        Credit::new(record.person_id.clone(), record.role)
    }
}

impl fmt::Display for Credit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.person_id, self.role)
    }
}

/// An unordered pair of credits in canonical form (`first <= second`).
///
/// Fields are private so the only way in is `CollaboratorPair::try_new`, which
/// checks the pair against the active pattern.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollaboratorPair {
    first: Credit,
    second: Credit,
}

impl CollaboratorPair {
    /// Canonicalises `a` and `b` into a pair, or returns `None` when their
    /// roles do not form `pattern` or both credits belong to the same person.
    pub fn try_new(a: Credit, b: Credit, pattern: &RolePattern) -> Option<Self> {
        if a.person_id == b.person_id || !pattern.matches(a.role, b.role) {
            return None;
        }
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Some(Self { first, second })
    }

    pub fn first(&self) -> &Credit {
        &self.first
    }

    pub fn second(&self) -> &Credit {
        &self.second
    }

    /// Both members, in canonical order.
    pub fn members(&self) -> [&Credit; 2] {
        [&self.first, &self.second]
    }
}

impl fmt::Display for CollaboratorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::registry::pattern_for;

    #[test]
    fn test_pair_is_canonical_regardless_of_argument_order() {
        let pattern = pattern_for(4).unwrap();
        let director = Credit::new("nm0151653", Role::Director);
        let actor = Credit::new("nm0156955", Role::Actor);

        let ab = CollaboratorPair::try_new(director.clone(), actor.clone(), &pattern).unwrap();
        let ba = CollaboratorPair::try_new(actor, director, &pattern).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.first().person_id, "nm0151653");
    }

    #[test]
    fn test_pair_rejects_mismatched_roles_and_self_pairs() {
        let pattern = pattern_for(6).unwrap();
        let producer = Credit::new("nm1", Role::Producer);
        let also_director = Credit::new("nm1", Role::Director);
        let actor = Credit::new("nm2", Role::Actor);

        assert!(CollaboratorPair::try_new(producer.clone(), actor, &pattern).is_none());
        assert!(CollaboratorPair::try_new(producer, also_director, &pattern).is_none());
    }
}
