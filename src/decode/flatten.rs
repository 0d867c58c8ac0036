//! Record flattening

use serde_json::Value;

/// Column used when a record is not a JSON object
const SCALAR_COLUMN: &str = "value";

/// One flattened record: ordered `(column, cell)` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    /// Cell for `column`; `None` if the column is absent or null
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, cell)| cell.as_deref())
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> &[(String, Option<String>)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<(String, Option<String>)> {
        self.cells
    }
}

/// Flatten one record into a row
pub fn flatten_record(record: &Value) -> Row {
    let mut cells = Vec::new();
    match record {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_into(key, value, &mut cells);
            }
        }
        other => cells.push((SCALAR_COLUMN.to_string(), cell_text(other))),
    }
    Row { cells }
}

/// Flatten a page worth of records, keeping their order
pub fn flatten_records(records: &[Value]) -> Vec<Row> {
    records.iter().map(flatten_record).collect()
}

fn flatten_into(prefix: &str, value: &Value, cells: &mut Vec<(String, Option<String>)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{prefix}.{key}"), nested, cells);
            }
        }
        other => cells.push((prefix.to_string(), cell_text(other))),
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // Arrays and scalars keep their JSON text
        other => Some(other.to_string()),
    }
}
