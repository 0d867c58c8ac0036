//! Batch module
//!
//! Drives a whole run: reads account links from a CSV file, skips accounts
//! that already have an output file, and downloads the rest one by one.
//!
//! Accounts are processed strictly in sequence. The first failing account
//! aborts the run.

mod driver;
mod input;

pub use driver::{pending_handles, plan_from_input, BatchDriver, BatchSummary};
pub use input::{extract_handle_from_link, read_column};
