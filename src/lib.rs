// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Post Harvester
//!
//! Batch collector that drains the paginated timeline of each account in a
//! list and writes the posts to one CSV file per account.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use post_harvester::auth::read_bearer_token;
//! use post_harvester::config::{QueryParameters, RateLimitConfig};
//! use post_harvester::http::{page_limiter, lookup_limiter, HttpClient, HttpClientConfig};
//! use post_harvester::pagination::{PaginationEngine, SaveOptions};
//! use post_harvester::resolve::HandleResolver;
//! use post_harvester::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credential = read_bearer_token("bearer_token.txt")?;
//!     let client = HttpClient::with_config(HttpClientConfig::default())?;
//!
//!     let limits = RateLimitConfig::default();
//!     let resolver = HandleResolver::new(client.clone(), lookup_limiter(&limits));
//!     let account = resolver.resolve_str("@nhsuk", &credential).await?;
//!
//!     let engine = PaginationEngine::new(client, page_limiter(&limits)?);
//!     let save = SaveOptions::new("data", "nhsuk");
//!     let outcome = engine
//!         .fetch_and_save(&account, &credential, QueryParameters::timeline_defaults(), Some(&save))
//!         .await?;
//!     println!("{} rows ({})", outcome.rows(), outcome.stop);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  Batch Driver ──▶ Handle Resolver ──▶ Pagination Engine ──▶ ResultSet ──▶ CSV
//!       │                  │                    │
//!   input CSV         users lookup       timeline pages (≤ 32)
//!   output dir                           pause after each call
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Account newtypes and API limits
pub mod types;

/// Bearer credential loading
pub mod auth;

/// Run configuration and query parameters
pub mod config;

/// HTTP client and rate limiting
pub mod http;

/// Page model and record flattening
pub mod decode;

/// Result accumulation and CSV output
pub mod output;

/// Timeline pagination
pub mod pagination;

/// Handle to account identifier lookup
pub mod resolve;

/// Batch orchestration
pub mod batch;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::{AccountId, Handle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
