//! Timeline pagination loop

use super::types::{FetchOutcome, PaginationState, SaveOptions, StopReason};
use crate::auth::Credential;
use crate::config::QueryParameters;
use crate::decode::{flatten_records, Page};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RateLimiter};
use crate::output::{touch_empty_marker, write_timestamped};
use crate::types::{AccountId, MAX_REQUESTS};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Path of the timeline listing endpoint for an account
pub fn timeline_path(account_id: &AccountId) -> String {
    format!("2/users/{account_id}/tweets")
}

/// Drains an account timeline page by page
#[derive(Debug, Clone)]
pub struct PaginationEngine {
    client: HttpClient,
    limiter: Arc<dyn RateLimiter>,
}

impl PaginationEngine {
    /// Create an engine pausing with `limiter` after every call
    pub fn new(client: HttpClient, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { client, limiter }
    }

    /// Fetch every available page for `account_id`
    ///
    /// `params` must carry `max_results=100` and no continuation token;
    /// otherwise a configuration error is returned before any request.
    /// A non-200 response aborts the whole fetch with no retry.
    pub async fn fetch_all_pages(
        &self,
        account_id: &AccountId,
        credential: &Credential,
        mut params: QueryParameters,
    ) -> Result<FetchOutcome> {
        params.validate_for_pagination()?;

        let path = timeline_path(account_id);
        let mut state = PaginationState::new();

        let stop = loop {
            if state.requests >= MAX_REQUESTS {
                info!(
                    "Stopped {} after {} API calls; older posts are not retrievable",
                    account_id, state.requests
                );
                break StopReason::Ceiling;
            }

            let request = state.next_request_number();
            let url = self.client.endpoint(&path, &params)?;

            let sent = self.client.get(&url, credential).await;
            // Paced after every call, including failed ones
            self.limiter.pause().await;
            let response = sent?;
            let status = response.status();

            if status != StatusCode::OK {
                return Err(Error::api(request, status.as_u16()));
            }

            let body = response.bytes().await?;
            let page = Page::from_slice(&body)?;
            let first_page = state.is_first_page();
            state.requests = request;

            if page.notice_count() > 0 {
                warn!(
                    "Request {} for {} returned {} error notices",
                    request,
                    account_id,
                    page.notice_count()
                );
            }

            if first_page && page.result_count() == 0 {
                info!("No results found for {}", account_id);
                break StopReason::Empty;
            }

            let Some(records) = page.data.as_deref() else {
                info!(
                    "All posts for {} found after {} API calls",
                    account_id, request
                );
                break StopReason::NoData;
            };

            debug!("Request {} returned {} records", request, records.len());
            state.results.extend(flatten_records(records));

            match page.next_token() {
                None => {
                    info!(
                        "All posts for {} found after {} API calls",
                        account_id, request
                    );
                    break StopReason::NoToken;
                }
                Some(token) => {
                    params.set_continuation_token(token);
                    info!("Request {} successful. Sleeping and paginating.", request);
                }
            }
        };

        Ok(FetchOutcome {
            results: state.results,
            stop,
            requests: state.requests,
            saved_to: None,
        })
    }

    /// Fetch every page and, if `save` is given, persist the result
    ///
    /// An account with no posts gets a zero-byte marker file instead of a
    /// timestamped data file.
    pub async fn fetch_and_save(
        &self,
        account_id: &AccountId,
        credential: &Credential,
        params: QueryParameters,
        save: Option<&SaveOptions>,
    ) -> Result<FetchOutcome> {
        let mut outcome = self.fetch_all_pages(account_id, credential, params).await?;

        if !outcome.stop.is_empty_account() {
            let reference = save.map_or(account_id.as_str(), |s| s.reference.as_str());
            info!("All most recent posts for account {} downloaded", reference);
        }

        if let Some(save) = save {
            let path = if outcome.stop.is_empty_account() {
                touch_empty_marker(&save.output_dir, &save.reference)?
            } else {
                write_timestamped(&save.output_dir, &save.reference, &outcome.results)?
            };
            outcome.saved_to = Some(path);
        }

        Ok(outcome)
    }
}
