//! The person table: `(nconst, primaryName)`.

use std::collections::BTreeSet;
use std::io::Read;

use hashbrown::HashMap;

use super::{cell, column_index, open_tsv, string_column, PersonLookup};
use crate::error::Result;
use crate::types::PersonRecord;

pub const PERSON_ID_COLUMN: &str = "nconst";
pub const NAME_COLUMN: &str = "primaryName";

/// Display names for a chosen set of people.
#[derive(Debug, Clone, Default)]
pub struct PersonIndex {
    names: HashMap<String, String>,
}

impl PersonIndex {
    /// Streams the person table and keeps only the ids in `wanted`, stopping
    /// early once all of them have been found.
    pub fn load_for<R: Read>(input: R, batch_size: usize, wanted: &BTreeSet<String>) -> Result<Self> {
        let mut index = PersonIndex::default();
        if wanted.is_empty() {
            return Ok(index);
        }

        let reader = open_tsv(input, batch_size)?;
        let schema = arrow::record_batch::RecordBatchReader::schema(&reader);
        let id_idx = column_index(&schema, PERSON_ID_COLUMN)?;
        let name_idx = column_index(&schema, NAME_COLUMN)?;

        for batch_result in reader {
            let batch = batch_result?;
            let ids = string_column(&batch, id_idx, PERSON_ID_COLUMN)?;
            let names = string_column(&batch, name_idx, NAME_COLUMN)?;

            for row in 0..batch.num_rows() {
                if let (Some(id), Some(name)) = (cell(ids, row), cell(names, row)) {
                    if wanted.contains(id) {
                        index.names.insert(id.to_string(), name.to_string());
                    }
                }
            }
            if index.names.len() == wanted.len() {
                break;
            }
        }

        log::debug!(
            "Resolved {} of {} requested person names",
            index.names.len(),
            wanted.len()
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PersonLookup for PersonIndex {
    fn person_name(&self, person_id: &str) -> Option<&str> {
        self.names.get(person_id).map(String::as_str)
    }
}

impl FromIterator<PersonRecord> for PersonIndex {
    fn from_iter<I: IntoIterator<Item = PersonRecord>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|p| (p.person_id, p.name)).collect(),
        }
    }
}
