//! Pagination module
//!
//! Drains the cursor-paginated timeline endpoint for one account.
//!
//! # Overview
//!
//! The [`PaginationEngine`] issues at most [`MAX_REQUESTS`](crate::types::MAX_REQUESTS)
//! sequential requests, each carrying the continuation token returned by the
//! previous page, and accumulates every record into a single
//! [`ResultSet`](crate::output::ResultSet). The [`StopReason`] of a finished
//! fetch tells the caller why the loop ended.

mod engine;
mod types;

pub use engine::{timeline_path, PaginationEngine};
pub use types::{FetchOutcome, PaginationState, SaveOptions, StopReason};

#[cfg(test)]
mod tests;
