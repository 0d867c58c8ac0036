//! Response decoder module
//!
//! Parses listing responses into [`Page`]s and flattens each record into a
//! tabular [`Row`].
//!
//! # Overview
//!
//! Nested object paths become dotted column names (`public_metrics.like_count`),
//! arrays are kept whole as compact JSON text in a single cell, and `null`
//! values become empty cells.

mod flatten;
mod page;

pub use flatten::{flatten_record, flatten_records, Row};
pub use page::{Page, PageMeta};
