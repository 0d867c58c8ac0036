//! Tests for pagination module

use super::*;
use crate::auth::Credential;
use crate::config::QueryParameters;
use crate::error::Error;
use crate::http::{FixedDelay, HttpClient, HttpClientConfig, RateLimiter};
use crate::types::AccountId;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMELINE: &str = "/2/users/42/tweets";

fn engine_for(server: &MockServer) -> PaginationEngine {
    engine_with_limiter(server, Arc::new(FixedDelay::none()))
}

fn engine_with_limiter(server: &MockServer, limiter: Arc<dyn RateLimiter>) -> PaginationEngine {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    PaginationEngine::new(HttpClient::with_config(config).unwrap(), limiter)
}

fn account() -> AccountId {
    AccountId::new("42")
}

fn credential() -> Credential {
    Credential::new("test-token")
}

/// A page holding records with ids `start..end`
fn page(start: u32, end: u32, next_token: Option<&str>) -> Value {
    let data: Vec<Value> = (start..end)
        .map(|i| json!({"id": i.to_string(), "text": format!("post {i}")}))
        .collect();
    let mut meta = json!({"result_count": data.len()});
    if let Some(token) = next_token {
        meta["next_token"] = json!(token);
    }
    json!({"data": data, "meta": meta})
}

fn ids(outcome: &FetchOutcome) -> Vec<String> {
    outcome
        .results
        .column_values("id")
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

async fn mount_first(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(TIMELINE))
        .and(query_param_is_missing("pagination_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_after(server: &MockServer, token: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(TIMELINE))
        .and(query_param("pagination_token", token))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[derive(Debug, Default)]
struct CountingLimiter {
    pauses: AtomicU32,
}

#[async_trait]
impl RateLimiter for CountingLimiter {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn test_rejects_wrong_page_size_without_calling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let params = QueryParameters::timeline_defaults().with("max_results", "50");
    let err = engine
        .fetch_all_pages(&account(), &credential(), params)
        .await
        .unwrap_err();

    assert!(err.is_config());
}

#[tokio::test]
async fn test_rejects_missing_page_size_without_calling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let params = QueryParameters::new().with("tweet.fields", "id,text");
    let err = engine
        .fetch_all_pages(&account(), &credential(), params)
        .await
        .unwrap_err();

    assert!(err.is_config());
}

#[tokio::test]
async fn test_rejects_seeded_token_without_calling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let mut params = QueryParameters::timeline_defaults();
    params.set_continuation_token("resume-here");
    let err = engine
        .fetch_all_pages(&account(), &credential(), params)
        .await
        .unwrap_err();

    assert!(err.is_config());
}

// ============================================================================
// Termination
// ============================================================================

#[tokio::test]
async fn test_empty_first_page_stops_immediately() {
    let server = MockServer::start().await;
    mount_first(&server, json!({"meta": {"result_count": 0}})).await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::Empty);
    assert_eq!(outcome.requests, 1);
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn test_empty_first_page_ignores_token() {
    let server = MockServer::start().await;
    mount_first(
        &server,
        json!({"data": [], "meta": {"result_count": 0, "next_token": "t1"}}),
    )
    .await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::Empty);
    assert_eq!(outcome.requests, 1);
}

#[tokio::test]
async fn test_single_page_without_token() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 50, None)).await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::NoToken);
    assert_eq!(outcome.requests, 1);
    assert_eq!(outcome.rows(), 50);
}

#[tokio::test]
async fn test_follows_tokens_in_page_order() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 2, Some("t1"))).await;
    mount_after(&server, "t1", page(2, 4, Some("t2"))).await;
    mount_after(&server, "t2", page(4, 5, None)).await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::NoToken);
    assert_eq!(outcome.requests, 3);
    assert_eq!(ids(&outcome), vec!["0", "1", "2", "3", "4"]);
}

#[tokio::test]
async fn test_missing_data_stops_without_appending() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 3, Some("t1"))).await;
    mount_after(
        &server,
        "t1",
        json!({"meta": {"result_count": 0, "next_token": "t2"}}),
    )
    .await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::NoData);
    assert_eq!(outcome.requests, 2);
    assert_eq!(ids(&outcome), vec!["0", "1", "2"]);
}

#[tokio::test]
async fn test_missing_data_on_first_page_with_count() {
    let server = MockServer::start().await;
    mount_first(&server, json!({"meta": {"result_count": 5}})).await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::NoData);
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn test_empty_later_page_stops_on_missing_token() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 100, Some("t1"))).await;
    mount_after(&server, "t1", page(100, 200, Some("t2"))).await;
    mount_after(&server, "t2", page(200, 300, Some("t3"))).await;
    mount_after(&server, "t3", json!({"data": [], "meta": {"result_count": 0}})).await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::NoToken);
    assert_eq!(outcome.requests, 4);
    assert_eq!(outcome.rows(), 300);
}

#[tokio::test]
async fn test_never_exceeds_request_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMELINE))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 1, Some("more"))))
        .expect(32)
        .mount(&server)
        .await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::Ceiling);
    assert!(outcome.stop.is_truncated());
    assert_eq!(outcome.requests, 32);
    assert_eq!(outcome.rows(), 32);
}

// ============================================================================
// Requests and Failures
// ============================================================================

#[tokio::test]
async fn test_request_carries_bearer_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMELINE))
        .and(header("Authorization", "Bearer test-token"))
        .and(query_param("max_results", "100"))
        .and(query_param(
            "poll.fields",
            "duration_minutes,end_datetime,id,options,voting_status",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap();

    assert_eq!(outcome.rows(), 1);
}

#[tokio::test]
async fn test_error_status_aborts_with_sequence_number() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 2, Some("t1"))).await;
    Mock::given(method("GET"))
        .and(path(TIMELINE))
        .and(query_param("pagination_token", "t1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { request: 2, status: 503 }));
}

#[tokio::test]
async fn test_non_200_success_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn test_pauses_after_every_call_including_failures() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 1, Some("t1"))).await;
    Mock::given(method("GET"))
        .and(query_param("pagination_token", "t1"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let limiter = Arc::new(CountingLimiter::default());
    let engine = engine_with_limiter(&server, limiter.clone());
    let result = engine
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await;

    assert!(result.is_err());
    assert_eq!(limiter.pauses.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalid_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .fetch_all_pages(&account(), &credential(), QueryParameters::timeline_defaults())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_fetch_and_save_writes_timestamped_file() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 3, None)).await;
    let dir = tempdir().unwrap();

    let save = SaveOptions::new(dir.path(), "nhsuk");
    let outcome = engine_for(&server)
        .fetch_and_save(
            &account(),
            &credential(),
            QueryParameters::timeline_defaults(),
            Some(&save),
        )
        .await
        .unwrap();

    let saved = outcome.saved_to.unwrap();
    let name = saved.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("nhsuk_"));
    assert!(!name.contains("empty"));

    let contents = std::fs::read_to_string(&saved).unwrap();
    assert_eq!(contents.lines().count(), 4);
}

#[tokio::test]
async fn test_fetch_and_save_empty_account_writes_marker() {
    let server = MockServer::start().await;
    mount_first(&server, json!({"meta": {"result_count": 0}})).await;
    let dir = tempdir().unwrap();

    let save = SaveOptions::new(dir.path(), "quiet");
    let outcome = engine_for(&server)
        .fetch_and_save(
            &account(),
            &credential(),
            QueryParameters::timeline_defaults(),
            Some(&save),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.saved_to,
        Some(dir.path().join("quiet_2021_empty.csv"))
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_fetch_without_save_writes_nothing() {
    let server = MockServer::start().await;
    mount_first(&server, page(0, 1, None)).await;

    let outcome = engine_for(&server)
        .fetch_and_save(
            &account(),
            &credential(),
            QueryParameters::timeline_defaults(),
            None,
        )
        .await
        .unwrap();

    assert!(outcome.saved_to.is_none());
    assert_eq!(outcome.rows(), 1);
}

#[test]
fn test_timeline_path() {
    assert_eq!(timeline_path(&AccountId::new("783214")), "2/users/783214/tweets");
}

#[test]
fn test_stop_reason_helpers() {
    assert!(StopReason::Empty.is_empty_account());
    assert!(!StopReason::NoData.is_empty_account());
    assert!(StopReason::Ceiling.is_truncated());
    assert!(!StopReason::NoToken.is_truncated());
    assert_eq!(StopReason::NoToken.to_string(), "last page");
}
