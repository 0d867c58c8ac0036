//! Tabular accumulation of flattened rows

use crate::decode::Row;
use crate::error::Result;
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered rows over the union of every column seen so far
///
/// Columns appear in first-seen order. Rows keep insertion order and are
/// never reordered; cells for columns a row lacks are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result set from rows
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut set = Self::new();
        set.extend(rows);
        set
    }

    /// Append one row, registering any new columns
    pub fn push_row(&mut self, row: Row) {
        let mut values = vec![None; self.columns.len()];

        for (name, cell) in row.into_cells() {
            let position = match self.index.get(&name) {
                Some(&position) => position,
                None => {
                    let position = self.columns.len();
                    self.index.insert(name.clone(), position);
                    self.columns.push(name);
                    position
                }
            };
            if values.len() <= position {
                values.resize(position + 1, None);
            }
            values[position] = cell;
        }

        self.rows.push(values);
    }

    /// Append rows in order
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        for row in rows {
            self.push_row(row);
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell at `row` for `column`
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let position = *self.index.get(column)?;
        self.rows
            .get(row)?
            .get(position)
            .and_then(|cell| cell.as_deref())
    }

    /// All cells of one column, one entry per row
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.index.get(column) {
            Some(&position) => self
                .rows
                .iter()
                .map(|row| row.get(position).and_then(|cell| cell.as_deref()))
                .collect(),
            None => vec![None; self.rows.len()],
        }
    }

    /// Convert to a RecordBatch with one nullable Utf8 column per column
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();

        let arrays: Vec<ArrayRef> = self
            .columns
            .iter()
            .map(|name| Arc::new(StringArray::from(self.column_values(name))) as ArrayRef)
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.len()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &options,
        )?)
    }
}
