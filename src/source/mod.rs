// In: src/source/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Source Layer
// ====================================================================================
//
// The `source` layer turns the tab-separated working tables into Arrow
// `RecordBatch` streams and typed records. It is the only place that knows about
// column names and cell encodings.
//
//   1. [open_tsv]            -> reads the header line itself, builds an all-Utf8
//                               schema from it, and hands the rest of the input
//                               to the Arrow CSV reader in `batch_size` batches.
//                               `RowGuard` blanks lines the reader would reject.
//   2. [credits]             -> resolves `(tconst, nconst, category)` and decodes
//                               rows into `CreditRecord`s for the aggregator.
//   3. [films] / [persons]   -> build id-keyed indexes once, used for the film
//                               whitelist and for result enrichment.
//
// Every column is read as nullable Utf8, so bad cells surface as counted skips
// in the typed layers instead of failing the Arrow reader.
// ====================================================================================

pub mod credits;
pub mod films;
pub mod persons;
pub mod rows;

use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;

use arrow::array::{Array, RecordBatch, StringArray};
use arrow::csv::{Reader, ReaderBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::error::{CostarError, Result};
use crate::types::FilmRecord;

pub use credits::{open_credit_stream, CreditColumns};
pub use films::FilmCatalog;
pub use persons::PersonIndex;
pub use rows::RowGuard;

/// Batch reader over a tab-separated table.
pub type TsvReader<R> = Reader<RowGuard<R>>;

/// Resolves film ids to film records.
pub trait FilmLookup {
    fn film(&self, film_id: &str) -> Option<&FilmRecord>;
}

/// Resolves person ids to display names.
pub trait PersonLookup {
    fn person_name(&self, person_id: &str) -> Option<&str>;
}

impl FilmLookup for hashbrown::HashMap<String, FilmRecord> {
    fn film(&self, film_id: &str) -> Option<&FilmRecord> {
        self.get(film_id)
    }
}

impl FilmLookup for std::collections::HashMap<String, FilmRecord> {
    fn film(&self, film_id: &str) -> Option<&FilmRecord> {
        self.get(film_id)
    }
}

impl PersonLookup for hashbrown::HashMap<String, String> {
    fn person_name(&self, person_id: &str) -> Option<&str> {
        self.get(person_id).map(String::as_str)
    }
}

impl PersonLookup for std::collections::HashMap<String, String> {
    fn person_name(&self, person_id: &str) -> Option<&str> {
        self.get(person_id).map(String::as_str)
    }
}

/// Opens a tab-separated table whose first line is a header.
pub fn open_tsv<R: Read>(input: R, batch_size: usize) -> Result<TsvReader<R>> {
    if batch_size == 0 {
        return Err(CostarError::Config("batch_size_rows must be positive".into()));
    }

    let mut buffered = BufReader::new(input);
    let mut header = String::new();
    if buffered.read_line(&mut header)? == 0 {
        return Err(CostarError::MissingColumn("<header row>".into()));
    }
    let schema = header_schema(&header);
    let rows = RowGuard::new(buffered, schema.fields().len());

    let reader = ReaderBuilder::new(schema)
        .with_header(false)
        .with_delimiter(b'\t')
        .with_batch_size(batch_size)
        .with_truncated_rows(true)
        .build(rows)?;
    Ok(reader)
}

/// Builds a nullable all-Utf8 schema from a header line.
fn header_schema(header: &str) -> SchemaRef {
    let fields: Vec<Field> = header
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(|name| Field::new(name.trim(), DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Finds a column by name.
pub(crate) fn column_index(schema: &Schema, name: &str) -> Result<usize> {
    schema
        .index_of(name)
        .map_err(|_| CostarError::MissingColumn(name.to_string()))
}

/// Borrows a column as a string array.
pub(crate) fn string_column<'a>(
    batch: &'a RecordBatch,
    idx: usize,
    name: &str,
) -> Result<&'a StringArray> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CostarError::InternalError(format!("column '{}' is not Utf8", name)))
}

/// A cell's text, or `None` when it is null.
pub(crate) fn cell(array: &StringArray, row: usize) -> Option<&str> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_open_tsv_uses_header_names() {
        let data = "tconst\tnconst\tcategory\ntt1\tnm1\tactor\ntt1\tnm2\tdirector\ntt2\tnm3\tactress\n";
        let mut reader = open_tsv(Cursor::new(data), 2).unwrap();

        let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
        assert_eq!(column_index(&schema, "nconst").unwrap(), 1);
        assert!(matches!(
            column_index(&schema, "primaryName"),
            Err(CostarError::MissingColumn(_))
        ));

        let first = reader.next().unwrap().unwrap();
        let second = reader.next().unwrap().unwrap();
        assert_eq!(first.num_rows(), 2);
        assert_eq!(second.num_rows(), 1);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_open_tsv_survives_rows_with_extra_fields() {
        let data = "tconst\tnconst\tcategory\ntt1\tnm1\tactor\ntt1\tnm2\tactor\textra\ntt1\tnm3\tdirector\n";
        let mut reader = open_tsv(Cursor::new(data), 10).unwrap();

        let batch = reader.next().unwrap().unwrap();
        assert_eq!(batch.num_rows(), 3);
        let persons = string_column(&batch, 1, "nconst").unwrap();
        assert_eq!(cell(persons, 0), Some("nm1"));
        assert!(cell(persons, 1).map_or(true, str::is_empty));
        assert_eq!(cell(persons, 2), Some("nm3"));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_open_tsv_rejects_empty_input_and_zero_batch() {
        assert!(matches!(
            open_tsv(Cursor::new(""), 10),
            Err(CostarError::MissingColumn(_))
        ));
        assert!(matches!(
            open_tsv(Cursor::new("a\tb\n"), 0),
            Err(CostarError::Config(_))
        ));
    }

    #[test]
    fn test_plain_maps_serve_as_lookups() {
        let mut names = std::collections::HashMap::new();
        names.insert("nm1".to_string(), "Cheh Chang".to_string());
        assert_eq!(names.person_name("nm1"), Some("Cheh Chang"));
        assert_eq!(names.person_name("nm2"), None);

        let films: hashbrown::HashMap<String, FilmRecord> = hashbrown::HashMap::new();
        assert!(films.film("tt1").is_none());
    }
}
