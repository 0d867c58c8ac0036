//! CLI module
//!
//! Command-line interface for harvesting timelines.
//!
//! # Commands
//!
//! - `fetch` - Download one account
//! - `batch` - Download every pending account from the input file
//! - `resolve` - Print the account identifier for a handle

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
