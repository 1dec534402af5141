//! Row records of the three working tables.

use super::Role;
use crate::error::CostarError;
use serde::{Deserialize, Serialize};

/// One `(film, person, role)` fact from the credit table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreditRecord {
    pub film_id: String,
    pub person_id: String,
    pub role: Role,
}

impl CreditRecord {
    pub fn new(film_id: impl Into<String>, person_id: impl Into<String>, role: Role) -> Self {
        Self {
            film_id: film_id.into(),
            person_id: person_id.into(),
            role,
        }
    }

    /// Builds a record from raw, possibly-missing table cells.
    ///
    /// Missing cells (null, empty, or the `\N` marker) and unknown categories
    /// are reported as `MalformedRecord`.
    pub fn from_cells(
        film_id: Option<&str>,
        person_id: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self, CostarError> {
        let film_id = required_cell("tconst", film_id)?;
        let person_id = required_cell("nconst", person_id)?;
        let role = required_cell("category", category)?.parse::<Role>()?;
        Ok(Self::new(film_id, person_id, role))
    }
}

/// Returns the trimmed cell, or `MalformedRecord` if it is absent.
pub(crate) fn required_cell<'a>(
    column: &str,
    cell: Option<&'a str>,
) -> Result<&'a str, CostarError> {
    match cell.map(str::trim) {
        Some(value) if !value.is_empty() && value != r"\N" => Ok(value),
        _ => Err(CostarError::MalformedRecord(format!(
            "missing value for '{}'",
            column
        ))),
    }
}

/// One row of the film table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FilmRecord {
    pub film_id: String,
    pub year: i32,
    pub title: String,
    pub average_rating: f64,
    pub vote_count: u64,
}

impl FilmRecord {
    /// The display form used in reports, e.g. `Vengeance (1970) with rating 7.2`.
    pub fn display(&self) -> String {
        format!(
            "{} ({}) with rating {:.1}",
            self.title, self.year, self.average_rating
        )
    }
}

/// One row of the person table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub person_id: String,
    pub name: String,
}
