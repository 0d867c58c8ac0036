//! HTTP client module
//!
//! Provides the authenticated HTTP client and the rate limiters that space
//! out API calls.
//!
//! # Features
//!
//! - **Endpoint URLs**: base URL plus path plus encoded query parameters
//! - **Bearer Auth**: every request carries the loaded credential
//! - **Rate Limiting**: flat delay by default, token bucket using governor on request

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{lookup_limiter, page_limiter, FixedDelay, QuotaLimiter, RateLimiter};
