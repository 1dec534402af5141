// In: src/query.rs

//! The caller's request, validated as a whole before any streaming starts.

use serde::{Deserialize, Serialize};

use crate::error::{CostarError, Result};
use crate::pairing::{pattern_for, RolePattern};

pub const RATING_FLOOR: f64 = 0.0;
pub const RATING_CEIL: f64 = 10.0;
pub const YEAR_FLOOR: i32 = 1900;
pub const YEAR_CEIL: i32 = 2018;
pub const MIN_RESULT_COUNT: usize = 1;
pub const MAX_RESULT_COUNT: usize = 10;

/// Inclusive rating and year bounds a film must satisfy to be aggregated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FilmFilter {
    pub min_rating: f64,
    pub max_rating: f64,
    pub min_year: i32,
    pub max_year: i32,
}

impl FilmFilter {
    pub fn validate(&self) -> Result<()> {
        let rating_ok = (RATING_FLOOR..=RATING_CEIL).contains(&self.min_rating)
            && (RATING_FLOOR..=RATING_CEIL).contains(&self.max_rating)
            && self.min_rating < self.max_rating;
        if !rating_ok {
            return Err(CostarError::InvalidRatingRange {
                min: self.min_rating,
                max: self.max_rating,
            });
        }

        let years_ok = (YEAR_FLOOR..=YEAR_CEIL).contains(&self.min_year)
            && (YEAR_FLOOR..=YEAR_CEIL).contains(&self.max_year)
            && self.min_year < self.max_year;
        if !years_ok {
            return Err(CostarError::InvalidYearRange {
                min: self.min_year,
                max: self.max_year,
            });
        }
        Ok(())
    }

    pub fn admits(&self, year: i32, rating: f64) -> bool {
        (self.min_year..=self.max_year).contains(&year)
            && rating >= self.min_rating
            && rating <= self.max_rating
    }
}

/// Everything one run needs from the user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PairQuery {
    pub pattern_choice: usize,
    pub filter: FilmFilter,
    pub result_count: usize,
}

/// A `PairQuery` that passed validation, with its pattern resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedQuery {
    pub pattern: RolePattern,
    pub filter: FilmFilter,
    pub result_count: usize,
}

impl PairQuery {
    /// Checks every caller precondition.
    pub fn validate(&self) -> Result<ValidatedQuery> {
        let pattern = pattern_for(self.pattern_choice)?;
        self.filter.validate()?;
        if !(MIN_RESULT_COUNT..=MAX_RESULT_COUNT).contains(&self.result_count) {
            return Err(CostarError::InvalidResultCount(self.result_count));
        }
        Ok(ValidatedQuery {
            pattern,
            filter: self.filter,
            result_count: self.result_count,
        })
    }
}
