//! Handle lookup against the users endpoint

use crate::auth::Credential;
use crate::config::QueryParameters;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RateLimiter};
use crate::types::{AccountId, Handle};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Path of the users-by-username lookup endpoint
pub const LOOKUP_PATH: &str = "2/users/by";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    id: String,
}

/// Resolves handles to account identifiers
#[derive(Debug, Clone)]
pub struct HandleResolver {
    client: HttpClient,
    limiter: Arc<dyn RateLimiter>,
}

impl HandleResolver {
    pub fn new(client: HttpClient, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { client, limiter }
    }

    /// Validate `raw` and look up its account identifier
    ///
    /// Malformed handles fail before any request is made.
    pub async fn resolve_str(&self, raw: &str, credential: &Credential) -> Result<AccountId> {
        let handle = Handle::parse(raw)?;
        self.resolve(&handle, credential).await
    }

    /// Look up the account identifier for `handle`
    pub async fn resolve(&self, handle: &Handle, credential: &Credential) -> Result<AccountId> {
        let params = QueryParameters::new().with("usernames", handle.as_str());
        let url = self.client.endpoint(LOOKUP_PATH, &params)?;

        let sent = self.client.get(&url, credential).await;
        self.limiter.pause().await;
        let response = sent?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::api(1, status.as_u16()));
        }

        let body = response.bytes().await?;
        let lookup: LookupResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::decode(format!("Failed to parse lookup response: {e}")))?;

        let user = lookup
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::decode(format!("No account found for handle '{handle}'")))?;

        debug!("Resolved {} to {}", handle, user.id);
        Ok(AccountId::new(user.id))
    }
}
