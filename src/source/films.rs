//! The film table: `(tconst, startYear, primaryTitle, averageRating, numVotes)`.

use std::io::Read;

use hashbrown::HashMap;

use super::{cell, column_index, open_tsv, string_column, FilmLookup};
use crate::error::{CostarError, Result};
use crate::pairing::FilmWhitelist;
use crate::query::FilmFilter;
use crate::types::records::required_cell;
use crate::types::FilmRecord;

pub const FILM_ID_COLUMN: &str = "tconst";
pub const YEAR_COLUMN: &str = "startYear";
pub const TITLE_COLUMN: &str = "primaryTitle";
pub const RATING_COLUMN: &str = "averageRating";
pub const VOTES_COLUMN: &str = "numVotes";

/// Film records indexed by film id, built once per run.
#[derive(Debug, Clone, Default)]
pub struct FilmCatalog {
    films: HashMap<String, FilmRecord>,
    skipped_rows: u64,
}

impl FilmCatalog {
    /// Reads the whole film table. Rows that fail to parse are skipped and
    /// counted in `skipped_rows`.
    pub fn load<R: Read>(input: R, batch_size: usize) -> Result<Self> {
        let reader = open_tsv(input, batch_size)?;
        let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
        let id_idx = column_index(&schema, FILM_ID_COLUMN)?;
        let year_idx = column_index(&schema, YEAR_COLUMN)?;
        let title_idx = column_index(&schema, TITLE_COLUMN)?;
        let rating_idx = column_index(&schema, RATING_COLUMN)?;
        let votes_idx = column_index(&schema, VOTES_COLUMN)?;

        let mut catalog = FilmCatalog::default();
        for batch_result in reader {
            let batch = batch_result?;
            let ids = string_column(&batch, id_idx, FILM_ID_COLUMN)?;
            let years = string_column(&batch, year_idx, YEAR_COLUMN)?;
            let titles = string_column(&batch, title_idx, TITLE_COLUMN)?;
            let ratings = string_column(&batch, rating_idx, RATING_COLUMN)?;
            let votes = string_column(&batch, votes_idx, VOTES_COLUMN)?;

            for row in 0..batch.num_rows() {
                let parsed = parse_film_row(
                    cell(ids, row),
                    cell(years, row),
                    cell(titles, row),
                    cell(ratings, row),
                    cell(votes, row),
                );
                match parsed {
                    Ok(film) => catalog.insert(film),
                    Err(err) => {
                        log::debug!("Skipping film row: {}", err);
                        catalog.skipped_rows += 1;
                    }
                }
            }
        }

        log::info!(
            "Loaded {} films ({} rows skipped)",
            catalog.len(),
            catalog.skipped_rows
        );
        Ok(catalog)
    }

    pub fn insert(&mut self, film: FilmRecord) {
        self.films.insert(film.film_id.clone(), film);
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }

    /// The ids of every film inside `filter`'s rating and year bounds.
    pub fn whitelist(&self, filter: &FilmFilter) -> FilmWhitelist {
        self.films
            .values()
            .filter(|film| filter.admits(film.year, film.average_rating))
            .map(|film| film.film_id.clone())
            .collect()
    }
}

impl FilmLookup for FilmCatalog {
    fn film(&self, film_id: &str) -> Option<&FilmRecord> {
        self.films.get(film_id)
    }
}

impl FromIterator<FilmRecord> for FilmCatalog {
    fn from_iter<I: IntoIterator<Item = FilmRecord>>(iter: I) -> Self {
        let mut catalog = FilmCatalog::default();
        for film in iter {
            catalog.insert(film);
        }
        catalog
    }
}

fn parse_film_row(
    id: Option<&str>,
    year: Option<&str>,
    title: Option<&str>,
    rating: Option<&str>,
    votes: Option<&str>,
) -> Result<FilmRecord> {
    let film_id = required_cell(FILM_ID_COLUMN, id)?;
    Ok(FilmRecord {
        film_id: film_id.to_string(),
        year: parse_cell(YEAR_COLUMN, year)?,
        title: required_cell(TITLE_COLUMN, title)?.to_string(),
        average_rating: parse_cell(RATING_COLUMN, rating)?,
        vote_count: parse_cell(VOTES_COLUMN, votes)?,
    })
}

fn parse_cell<T: std::str::FromStr>(column: &str, value: Option<&str>) -> Result<T> {
    let raw = required_cell(column, value)?;
    raw.parse::<T>().map_err(|_| {
        CostarError::MalformedRecord(format!("cannot parse '{}' in column '{}'", raw, column))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FILMS: &str = "tconst\tstartYear\tprimaryTitle\taverageRating\tnumVotes\n\
        tt0065450\t1970\tVengeance\t7.2\t1500\n\
        tt0066587\t1970\tXiao sha xing\t7.2\t300\n\
        tt0068815\t1972\tLone Wolf and Cub: Sword of Vengeance\t7.9\t9000\n\
        tt0000574\t1906\tThe Story of the Kelly Gang\t6.2\t700\n\
        tt9999999\t\\N\tUndated\t5.0\t10\n";

    #[test]
    fn test_load_indexes_films_and_skips_bad_rows() {
        let catalog = FilmCatalog::load(Cursor::new(FILMS), 2).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.skipped_rows(), 1);

        let film = catalog.film("tt0068815").unwrap();
        assert_eq!(film.year, 1972);
        assert_eq!(film.vote_count, 9000);
        assert!(catalog.film("tt9999999").is_none());
    }

    #[test]
    fn test_whitelist_applies_filter() {
        let catalog = FilmCatalog::load(Cursor::new(FILMS), 100).unwrap();
        let filter = FilmFilter {
            min_rating: 7.0,
            max_rating: 10.0,
            min_year: 1960,
            max_year: 1971,
        };
        let whitelist = catalog.whitelist(&filter);

        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("tt0065450"));
        assert!(whitelist.contains("tt0066587"));
        assert!(!whitelist.contains("tt0068815"));
    }
}
