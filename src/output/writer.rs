//! CSV file writer
//!
//! File names embed the account reference:
//! - `{reference}_{YYYY-MM-DD_HH:MM:SS}.csv` for downloaded data
//! - `{reference}_2021_empty.csv`, a zero-byte marker for accounts with no posts

use super::result_set::ResultSet;
use crate::error::{Error, Result};
use arrow::csv::WriterBuilder;
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `strftime` format of the timestamp in data file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Tag that marks an account known to have no posts
pub const EMPTY_MARKER_TAG: &str = "2021_empty";

static OUTPUT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<reference>.+)_(?:\d{4}-\d{2}-\d{2}_\d{2}:\d{2}:\d{2}|2021_empty)\.csv$")
        .expect("valid regex")
});

/// Path of the data file for `reference` downloaded at `at`
pub fn timestamped_path(dir: impl AsRef<Path>, reference: &str, at: &DateTime<Local>) -> PathBuf {
    dir.as_ref()
        .join(format!("{reference}_{}.csv", at.format(TIMESTAMP_FORMAT)))
}

/// Path of the empty-account marker for `reference`
pub fn empty_marker_path(dir: impl AsRef<Path>, reference: &str) -> PathBuf {
    dir.as_ref().join(format!("{reference}_{EMPTY_MARKER_TAG}.csv"))
}

/// Write a result set as CSV with a header row
///
/// A result set without columns produces an empty file.
pub fn write_csv(path: impl AsRef<Path>, results: &ResultSet) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::output(format!("Failed to create file {}: {e}", path.display()))
    })?;
    write_to(file, path, results)
}

/// Write a result set to a fresh timestamped file under `dir`
pub fn write_timestamped(
    dir: impl AsRef<Path>,
    reference: &str,
    results: &ResultSet,
) -> Result<PathBuf> {
    write_timestamped_at(dir, reference, results, &Local::now())
}

/// Write a result set to the file named for `reference` at time `at`
///
/// An existing file with the same name is never overwritten.
pub fn write_timestamped_at(
    dir: impl AsRef<Path>,
    reference: &str,
    results: &ResultSet,
    at: &DateTime<Local>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = timestamped_path(dir, reference, at);
    info!("Saving file to {}", path.display());
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::output(format!(
                "{} already exists; results for {reference} were saved less than a second ago",
                path.display()
            )),
            _ => Error::output(format!("Failed to create file {}: {e}", path.display())),
        })?;
    write_to(file, &path, results)?;
    Ok(path)
}

fn write_to(file: File, path: &Path, results: &ResultSet) -> Result<usize> {
    if results.columns().is_empty() {
        return Ok(0);
    }

    let batch = results.to_record_batch()?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;

    debug!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(batch.num_rows())
}

/// Create the zero-byte marker for an account without posts
pub fn touch_empty_marker(dir: impl AsRef<Path>, reference: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = empty_marker_path(dir, reference);
    info!(
        "Results will not be written to a timestamped file; creating {} for future reference",
        path.display()
    );
    OpenOptions::new().create(true).append(true).open(&path)?;
    Ok(path)
}

/// Extract the account reference from a file name this crate wrote
pub fn reference_from_file_name(name: &str) -> Option<String> {
    OUTPUT_NAME_RE
        .captures(name)
        .and_then(|caps| caps.name("reference"))
        .map(|m| m.as_str().to_string())
}

/// References of every account that already has an output file in `dir`
///
/// A missing directory means nothing has been downloaded yet.
pub fn existing_references(dir: impl AsRef<Path>) -> Result<HashSet<String>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(HashSet::new());
    }

    let mut references = HashSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(reference) = entry
            .file_name()
            .to_str()
            .and_then(reference_from_file_name)
        {
            references.insert(reference);
        }
    }

    Ok(references)
}
