//! Common types used throughout the harvester
//!
//! This module contains the account-level newtypes and the fixed limits
//! imposed by the listing API.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// API Limits
// ============================================================================

/// Page size the listing endpoint must be asked for
pub const PAGE_SIZE: u32 = 100;

/// Maximum number of listing requests issued per account
pub const MAX_REQUESTS: u32 = 32;

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "max_results";

/// Query parameter carrying the continuation token
pub const CONTINUATION_PARAM: &str = "pagination_token";

// ============================================================================
// Handle
// ============================================================================

static HANDLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

/// Human-readable account name, stored without the leading "@"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Parse a handle, accepting an optional leading "@"
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.strip_prefix('@').unwrap_or(raw);
        if !HANDLE_RE.is_match(name) {
            return Err(Error::invalid_handle(raw));
        }
        Ok(Self(name.to_string()))
    }

    /// The handle without the "@"
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

// ============================================================================
// Account Identifier
// ============================================================================

/// Opaque, stable identifier the API assigns to an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
