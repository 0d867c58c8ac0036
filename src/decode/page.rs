//! Listing response model

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination metadata attached to every page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Number of records the API reports for this page
    #[serde(default)]
    pub result_count: Option<u64>,

    /// Continuation token; absent on the last page
    #[serde(default)]
    pub next_token: Option<String>,

    #[serde(default)]
    pub newest_id: Option<String>,

    #[serde(default)]
    pub oldest_id: Option<String>,
}

/// One response of the listing endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Records on this page; `None` when the key is absent
    #[serde(default)]
    pub data: Option<Vec<Value>>,

    /// Expanded objects referenced by the records (not flattened)
    #[serde(default)]
    pub includes: Option<Value>,

    #[serde(default)]
    pub meta: PageMeta,

    /// Error and omission notices
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

impl Page {
    /// Decode a page from a response body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::decode(format!("Failed to parse page: {e}")))
    }

    /// Result count reported by the API, or the size of `data` when unreported
    pub fn result_count(&self) -> u64 {
        self.meta
            .result_count
            .unwrap_or_else(|| self.data.as_ref().map_or(0, |d| d.len() as u64))
    }

    /// Continuation token for the next page, ignoring empty tokens
    pub fn next_token(&self) -> Option<&str> {
        self.meta.next_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Number of error or omission notices on the page
    pub fn notice_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }
}
