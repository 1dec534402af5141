// In: src/pairing/registry.rs

//! The fixed registry of role-pair patterns a caller may select.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CostarError;
use crate::types::Role;

/// An unordered multiset of exactly two roles.
///
/// The two roles are stored normalised (`low <= high`) so that
/// `{actor, director}` and `{director, actor}` compare equal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RolePattern {
    low: Role,
    high: Role,
}

impl RolePattern {
    pub fn new(a: Role, b: Role) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Both slots name the same role, e.g. `{actor, actor}`.
    pub fn is_homogeneous(&self) -> bool {
        self.low == self.high
    }

    /// The two roles in normalised order.
    pub fn roles(&self) -> (Role, Role) {
        (self.low, self.high)
    }

    /// Whether a credit with `role` can take part in a pair under this pattern.
    pub fn admits(&self, role: Role) -> bool {
        role == self.low || role == self.high
    }

    /// Whether the unordered multiset `{a, b}` equals this pattern.
    ///
    /// For a homogeneous pattern both roles must be the pattern's role; having
    /// just one of them match is not enough.
    pub fn matches(&self, a: Role, b: Role) -> bool {
        RolePattern::new(a, b) == *self
    }
}

impl fmt::Display for RolePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {}", self.low, self.high)
    }
}

/// The selectable patterns, numbered from 1 in this order.
const PATTERN_REGISTRY: [(Role, Role); 8] = [
    (Role::Actor, Role::Actress),
    (Role::Actor, Role::Actor),
    (Role::Actress, Role::Actress),
    (Role::Actor, Role::Director),
    (Role::Actress, Role::Director),
    (Role::Producer, Role::Director),
    (Role::Producer, Role::Actor),
    (Role::Producer, Role::Actress),
];

/// Number of entries in the registry.
pub const PATTERN_COUNT: usize = PATTERN_REGISTRY.len();

/// Resolves a 1-based registry choice to its pattern.
pub fn pattern_for(choice: usize) -> Result<RolePattern, CostarError> {
    choice
        .checked_sub(1)
        .and_then(|idx| PATTERN_REGISTRY.get(idx))
        .map(|&(a, b)| RolePattern::new(a, b))
        .ok_or(CostarError::InvalidChoice(choice))
}

/// All registry entries with their 1-based choice numbers, for listing to users.
pub fn registered_patterns() -> impl Iterator<Item = (usize, RolePattern)> {
    PATTERN_REGISTRY
        .iter()
        .enumerate()
        .map(|(idx, &(a, b))| (idx + 1, RolePattern::new(a, b)))
}
