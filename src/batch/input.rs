//! Batch input parsing
//!
//! The input is a CSV file with a header row; one column holds profile
//! links such as `https://twitter.com/nhsuk/status/1`.

use crate::error::{Error, Result};
use arrow::array::{Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use std::sync::Arc;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Extract the handle from a profile link
///
/// Takes the path segment right after the last `marker`, then keeps only
/// ASCII letters, digits and underscores. Text without the marker is
/// treated as the segment itself.
pub fn extract_handle_from_link(text: &str, marker: &str) -> String {
    let after_marker = text.rsplit(marker).next().unwrap_or(text);
    let segment = after_marker.split('/').next().unwrap_or_default();

    segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Read every value of `column` from a CSV file with a header row
///
/// Quoted fields may span lines. A leading UTF-8 byte order mark is
/// ignored, and empty cells come back as empty strings.
pub fn read_column(path: impl AsRef<Path>, column: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::file_not_found(path.display().to_string()),
        _ => Error::Io(e),
    })?;
    let contents = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(contents), Some(0))?;
    if inferred.fields().is_empty() {
        return Err(Error::config(format!(
            "Input file {} is empty",
            path.display()
        )));
    }

    let index = inferred
        .fields()
        .iter()
        .position(|field| field.name().trim() == column)
        .ok_or_else(|| {
            Error::config(format!(
                "Input file {} has no column '{column}'",
                path.display()
            ))
        })?;

    // Every column is read as text so links and ids are never reinterpreted
    let schema = Schema::new(
        inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_truncated_rows(true)
        .build(Cursor::new(contents))?;

    let mut values = Vec::new();
    for batch in reader {
        let batch = batch?;
        let cells = batch
            .column(index)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| Error::decode(format!("Column '{column}' is not text")))?;

        values.extend(
            cells
                .iter()
                .map(|cell| cell.map(str::trim).unwrap_or_default().to_string()),
        );
    }

    Ok(values)
}
