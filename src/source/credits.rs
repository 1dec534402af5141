//! The credit table: `(tconst, nconst, category)` rows, contiguous by film.

use std::io::Read;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatchReader;

use super::{cell, column_index, open_tsv, string_column, TsvReader};
use crate::error::{CostarError, Result};
use crate::types::CreditRecord;

pub const FILM_ID_COLUMN: &str = "tconst";
pub const PERSON_ID_COLUMN: &str = "nconst";
pub const CATEGORY_COLUMN: &str = "category";

/// Column positions of the credit fields within a batch schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditColumns {
    film: usize,
    person: usize,
    category: usize,
}

impl CreditColumns {
    pub fn resolve(schema: &Schema) -> Result<Self> {
        Ok(Self {
            film: column_index(schema, FILM_ID_COLUMN)?,
            person: column_index(schema, PERSON_ID_COLUMN)?,
            category: column_index(schema, CATEGORY_COLUMN)?,
        })
    }

    /// Decodes every row of `batch`, yielding `MalformedRecord` for rows with a
    /// missing cell or an unknown category.
    pub fn decode<'a>(
        &self,
        batch: &'a RecordBatch,
    ) -> Result<impl Iterator<Item = Result<CreditRecord, CostarError>> + 'a> {
        let films = string_column(batch, self.film, FILM_ID_COLUMN)?;
        let persons = string_column(batch, self.person, PERSON_ID_COLUMN)?;
        let categories = string_column(batch, self.category, CATEGORY_COLUMN)?;

        Ok((0..batch.num_rows()).map(move |row| {
            CreditRecord::from_cells(
                cell(films, row),
                cell(persons, row),
                cell(categories, row),
            )
        }))
    }
}

/// Opens the credit table and checks that the required columns are present
/// before any row is read.
pub fn open_credit_stream<R: Read>(input: R, batch_size: usize) -> Result<TsvReader<R>> {
    let reader = open_tsv(input, batch_size)?;
    CreditColumns::resolve(&reader.schema())?;
    Ok(reader)
}
