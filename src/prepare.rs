// In: src/prepare.rs

//! Reduces the raw title/name tables to the three working tables the search
//! reads: rated movies, their principal credits, and the names of the people
//! in those credits.
//!
//! Each reduction streams its input in batches. Output rows keep input order,
//! so a credit table that is contiguous by film stays contiguous.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::csv::{Writer, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::config::CostarConfig;
use crate::error::Result;
use crate::source::{cell, column_index, open_tsv, string_column};
use crate::types::Role;

/// Earliest start year kept in the film table.
const MIN_START_YEAR: i32 = 1800;

/// Row counts written per working table.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub films: u64,
    pub credits: u64,
    pub persons: u64,
}

/// Writes one tab-separated table with a header, batch by batch.
struct TsvTableWriter<W: Write> {
    writer: Writer<W>,
    schema: SchemaRef,
    rows: u64,
    wrote_batch: bool,
}

impl<W: Write> TsvTableWriter<W> {
    fn new(out: W, columns: &[&str]) -> Self {
        let fields: Vec<Field> = columns
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect();
        let writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(b'\t')
            .build(out);
        Self {
            writer,
            schema: Arc::new(Schema::new(fields)),
            rows: 0,
            wrote_batch: false,
        }
    }

    fn write_columns(&mut self, columns: Vec<Vec<&str>>) -> Result<()> {
        let arrays: Vec<ArrayRef> = columns
            .into_iter()
            .map(|values| Arc::new(StringArray::from(values)) as ArrayRef)
            .collect();
        let batch = RecordBatch::try_new(Arc::clone(&self.schema), arrays)?;
        self.rows += batch.num_rows() as u64;
        self.writer.write(&batch)?;
        self.wrote_batch = true;
        Ok(())
    }

    /// Flushes the table, writing an empty batch first so the header exists
    /// even when no rows were kept.
    fn finish(mut self) -> Result<u64> {
        if !self.wrote_batch {
            let empty = vec![Vec::new(); self.schema.fields().len()];
            self.write_columns(empty)?;
        }
        let rows = self.rows;
        let mut inner = self.writer.into_inner();
        inner.flush()?;
        Ok(rows)
    }
}

/// Keeps movies with a start year of at least 1800 that have a rating, joined
/// with that rating. Returns the kept film ids and the row count.
pub fn reduce_films<B, R, W>(
    basics: B,
    ratings: R,
    out: W,
    batch_size: usize,
) -> Result<(HashSet<String>, u64)>
where
    B: Read,
    R: Read,
    W: Write,
{
    let ratings = load_ratings(ratings, batch_size)?;

    let reader = open_tsv(basics, batch_size)?;
    let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
    let id_idx = column_index(&schema, "tconst")?;
    let type_idx = column_index(&schema, "titleType")?;
    let title_idx = column_index(&schema, "primaryTitle")?;
    let year_idx = column_index(&schema, "startYear")?;

    let mut table = TsvTableWriter::new(
        out,
        &["tconst", "startYear", "primaryTitle", "averageRating", "numVotes"],
    );
    let mut kept = HashSet::new();

    for batch_result in reader {
        let batch = batch_result?;
        let ids = string_column(&batch, id_idx, "tconst")?;
        let types = string_column(&batch, type_idx, "titleType")?;
        let titles = string_column(&batch, title_idx, "primaryTitle")?;
        let years = string_column(&batch, year_idx, "startYear")?;

        let mut columns: Vec<Vec<&str>> = vec![Vec::new(); 5];
        for row in 0..batch.num_rows() {
            let (Some(id), Some(title_type), Some(title), Some(year)) = (
                cell(ids, row),
                cell(types, row),
                cell(titles, row),
                cell(years, row),
            ) else {
                continue;
            };
            let recent_enough = year
                .parse::<i32>()
                .map_or(false, |y| y >= MIN_START_YEAR);
            if title_type != "movie" || !recent_enough {
                continue;
            }
            let Some((rating, votes)) = ratings.get(id) else {
                continue;
            };

            columns[0].push(id);
            columns[1].push(year);
            columns[2].push(title);
            columns[3].push(rating);
            columns[4].push(votes);
            kept.insert(id.to_string());
        }
        table.write_columns(columns)?;
    }

    let rows = table.finish()?;
    log::info!("Film table reduced to {} rated movies", rows);
    Ok((kept, rows))
}

fn load_ratings<R: Read>(input: R, batch_size: usize) -> Result<HashMap<String, (String, String)>> {
    let reader = open_tsv(input, batch_size)?;
    let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
    let id_idx = column_index(&schema, "tconst")?;
    let rating_idx = column_index(&schema, "averageRating")?;
    let votes_idx = column_index(&schema, "numVotes")?;

    let mut ratings = HashMap::new();
    for batch_result in reader {
        let batch = batch_result?;
        let ids = string_column(&batch, id_idx, "tconst")?;
        let values = string_column(&batch, rating_idx, "averageRating")?;
        let votes = string_column(&batch, votes_idx, "numVotes")?;
        for row in 0..batch.num_rows() {
            if let (Some(id), Some(value), Some(count)) =
                (cell(ids, row), cell(values, row), cell(votes, row))
            {
                ratings.insert(id.to_string(), (value.to_string(), count.to_string()));
            }
        }
    }
    Ok(ratings)
}

/// Keeps credits of kept films whose category is one of the five roles.
/// Returns the credited person ids and the row count.
pub fn reduce_credits<P, W>(
    principals: P,
    films: &HashSet<String>,
    out: W,
    batch_size: usize,
) -> Result<(HashSet<String>, u64)>
where
    P: Read,
    W: Write,
{
    let reader = open_tsv(principals, batch_size)?;
    let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
    let film_idx = column_index(&schema, "tconst")?;
    let person_idx = column_index(&schema, "nconst")?;
    let category_idx = column_index(&schema, "category")?;

    let mut table = TsvTableWriter::new(out, &["tconst", "nconst", "category"]);
    let mut persons = HashSet::new();

    for batch_result in reader {
        let batch = batch_result?;
        let film_ids = string_column(&batch, film_idx, "tconst")?;
        let person_ids = string_column(&batch, person_idx, "nconst")?;
        let categories = string_column(&batch, category_idx, "category")?;

        let mut columns: Vec<Vec<&str>> = vec![Vec::new(); 3];
        for row in 0..batch.num_rows() {
            let (Some(film), Some(person), Some(category)) = (
                cell(film_ids, row),
                cell(person_ids, row),
                cell(categories, row),
            ) else {
                continue;
            };
            if !films.contains(film) || category.parse::<Role>().is_err() {
                continue;
            }
            columns[0].push(film);
            columns[1].push(person);
            columns[2].push(category);
            persons.insert(person.to_string());
        }
        table.write_columns(columns)?;
    }

    let rows = table.finish()?;
    log::info!(
        "Credit table reduced to {} rows naming {} people",
        rows,
        persons.len()
    );
    Ok((persons, rows))
}

/// Keeps the names of the given people.
pub fn reduce_persons<N, W>(
    names: N,
    persons: &HashSet<String>,
    out: W,
    batch_size: usize,
) -> Result<u64>
where
    N: Read,
    W: Write,
{
    let reader = open_tsv(names, batch_size)?;
    let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
    let id_idx = column_index(&schema, "nconst")?;
    let name_idx = column_index(&schema, "primaryName")?;

    let mut table = TsvTableWriter::new(out, &["nconst", "primaryName"]);
    for batch_result in reader {
        let batch = batch_result?;
        let ids = string_column(&batch, id_idx, "nconst")?;
        let names = string_column(&batch, name_idx, "primaryName")?;

        let mut columns: Vec<Vec<&str>> = vec![Vec::new(); 2];
        for row in 0..batch.num_rows() {
            if let (Some(id), Some(name)) = (cell(ids, row), cell(names, row)) {
                if persons.contains(id) {
                    columns[0].push(id);
                    columns[1].push(name);
                }
            }
        }
        table.write_columns(columns)?;
    }

    let rows = table.finish()?;
    log::info!("Person table reduced to {} names", rows);
    Ok(rows)
}

/// Runs all three reductions between the paths in `config`.
pub fn prepare_dataset(config: &CostarConfig) -> Result<PrepareSummary> {
    config.validate()?;
    let batch_size = config.batch_size_rows;
    let raw = &config.raw;
    let data = &config.data;

    log::info!("Selecting rated movies from {}", raw.title_basics.display());
    let (films, film_rows) = reduce_films(
        File::open(&raw.title_basics)?,
        File::open(&raw.title_ratings)?,
        BufWriter::new(File::create(&data.films)?),
        batch_size,
    )?;

    log::info!("Selecting credits from {}", raw.title_principals.display());
    let (persons, credit_rows) = reduce_credits(
        File::open(&raw.title_principals)?,
        &films,
        BufWriter::new(File::create(&data.credits)?),
        batch_size,
    )?;
    drop(films);

    log::info!("Selecting names from {}", raw.name_basics.display());
    let person_rows = reduce_persons(
        File::open(&raw.name_basics)?,
        &persons,
        BufWriter::new(File::create(&data.persons)?),
        batch_size,
    )?;

    Ok(PrepareSummary {
        films: film_rows,
        credits: credit_rows,
        persons: person_rows,
    })
}
