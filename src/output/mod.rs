//! Output module
//!
//! Accumulates flattened rows and writes them to per-account CSV files.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Accumulating rows into a [`ResultSet`] with a growing column union
//! - Converting a result set to an Arrow RecordBatch
//! - Writing CSV files named after the account and download time
//! - Recognising previously written files so finished accounts can be skipped

mod result_set;
mod writer;

pub use result_set::ResultSet;
pub use writer::{
    empty_marker_path, existing_references, reference_from_file_name, timestamped_path,
    touch_empty_marker, write_csv, write_timestamped, write_timestamped_at, EMPTY_MARKER_TAG,
    TIMESTAMP_FORMAT,
};
