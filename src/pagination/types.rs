//! Pagination types
//!
//! Defines the loop state and the outcome reported to callers.

use crate::output::ResultSet;
use std::fmt;
use std::path::PathBuf;

/// Why a fetch stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The first page reported zero results; the account has no posts
    Empty,
    /// A page arrived without a record list
    NoData,
    /// A page arrived without a continuation token
    NoToken,
    /// The request ceiling was reached; results may be incomplete
    Ceiling,
}

impl StopReason {
    /// True when the account had nothing to download at all
    pub fn is_empty_account(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// True when more data may exist beyond what was fetched
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Ceiling)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "no results",
            Self::NoData => "page without data",
            Self::NoToken => "last page",
            Self::Ceiling => "request ceiling",
        };
        f.write_str(text)
    }
}

/// Mutable state carried across loop iterations
#[derive(Debug, Default)]
pub struct PaginationState {
    /// Requests issued so far
    pub requests: u32,
    /// Rows accumulated so far
    pub results: ResultSet,
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based sequence number of the request about to be issued
    pub fn next_request_number(&self) -> u32 {
        self.requests + 1
    }

    /// True while no request has completed
    pub fn is_first_page(&self) -> bool {
        self.requests == 0
    }
}

/// Result of draining one account's timeline
#[derive(Debug)]
pub struct FetchOutcome {
    /// Every row fetched, in page order
    pub results: ResultSet,
    /// Why pagination ended
    pub stop: StopReason,
    /// Number of requests issued
    pub requests: u32,
    /// File the results were written to, when saving was requested
    pub saved_to: Option<PathBuf>,
}

impl FetchOutcome {
    pub fn rows(&self) -> usize {
        self.results.len()
    }
}

/// Where to persist a finished fetch
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Directory receiving the file
    pub output_dir: PathBuf,
    /// Reference embedded in the file name (usually the handle)
    pub reference: String,
}

impl SaveOptions {
    pub fn new(output_dir: impl Into<PathBuf>, reference: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            reference: reference.into(),
        }
    }
}
