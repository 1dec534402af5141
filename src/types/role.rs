//! This module defines the canonical, type-safe representation of a person's
//! function on a film.

use crate::error::CostarError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The credit categories the working credit table is restricted to.
///
/// The derived ordering is used only to normalise role patterns and to break
/// ties between two credits of the same person; it carries no other meaning.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Director,
    Writer,
    Producer,
    Actor,
    Actress,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Director,
        Role::Writer,
        Role::Producer,
        Role::Actor,
        Role::Actress,
    ];

    /// The category string used by the credit tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Director => "director",
            Role::Writer => "writer",
            Role::Producer => "producer",
            Role::Actor => "actor",
            Role::Actress => "actress",
        }
    }
}

impl FromStr for Role {
    type Err = CostarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "director" => Ok(Role::Director),
            "writer" => Ok(Role::Writer),
            "producer" => Ok(Role::Producer),
            "actor" => Ok(Role::Actor),
            "actress" => Ok(Role::Actress),
            other => Err(CostarError::MalformedRecord(format!(
                "unknown credit category '{}'",
                other
            ))),
        }
    }
}

/// Provides the canonical string representation for a `Role`.
impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_string_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_category_is_malformed() {
        let err = "cinematographer".parse::<Role>().unwrap_err();
        assert!(matches!(err, CostarError::MalformedRecord(_)));
        // Categories are matched exactly, as written by the preparation step.
        assert!("Actor".parse::<Role>().is_err());
    }
}
