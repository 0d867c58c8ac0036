//! Configuration types for a harvesting run
//!
//! `HarvestConfig` is loaded from an optional YAML file and then overridden
//! from the command line. `QueryParameters` holds the field selection sent
//! to the listing endpoint.

use crate::auth::DEFAULT_TOKEN_FILE;
use crate::error::{Error, Result};
use crate::types::{CONTINUATION_PARAM, PAGE_SIZE, PAGE_SIZE_PARAM};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// File holding the bearer token on its first line
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    /// Directory receiving the per-account CSV files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Batch input settings
    #[serde(default)]
    pub input: InputConfig,

    /// Pauses applied after each API call
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            token_file: default_token_file(),
            output_dir: default_output_dir(),
            input: InputConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Load a config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::file_not_found(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::config("api.base_url must not be empty"));
        }
        if self.input.column.trim().is_empty() {
            return Err(Error::config("input.column must not be empty"));
        }
        if self.input.domain_marker.is_empty() {
            return Err(Error::config("input.domain_marker must not be empty"));
        }
        if self.rate_limit.strategy == RateLimitStrategy::Quota
            && (self.rate_limit.requests_per_window == 0 || self.rate_limit.window_secs == 0)
        {
            return Err(Error::config(
                "rate_limit.requests_per_window and rate_limit.window_secs must be positive",
            ));
        }
        Ok(())
    }
}

fn default_token_file() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_FILE)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

// ============================================================================
// API Config
// ============================================================================

/// Connection settings for the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API (scheme and host)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            headers: BTreeMap::new(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("post-harvester/{}", env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Input Config
// ============================================================================

/// Where the batch driver finds account links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// CSV file listing account links
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Column holding the links
    #[serde(default = "default_column")]
    pub column: String,

    /// Substring preceding the handle inside each link
    #[serde(default = "default_domain_marker")]
    pub domain_marker: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            column: default_column(),
            domain_marker: default_domain_marker(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("accounts.csv")
}

fn default_column() -> String {
    "link".to_string()
}

fn default_domain_marker() -> String {
    "twitter.com/".to_string()
}

// ============================================================================
// Rate Limit Config
// ============================================================================

/// How calls are spaced out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStrategy {
    /// Flat sleep after every call
    #[default]
    Fixed,
    /// Token bucket sized to the endpoint's window quota
    Quota,
}

/// Rate limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub strategy: RateLimitStrategy,

    /// Pause after each listing call (fixed strategy)
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Pause after each handle lookup
    #[serde(default = "default_lookup_delay_ms")]
    pub lookup_delay_ms: u64,

    /// Listing calls allowed per window (quota strategy)
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u32,

    /// Window length in seconds (quota strategy)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            strategy: RateLimitStrategy::default(),
            page_delay_ms: default_page_delay_ms(),
            lookup_delay_ms: default_lookup_delay_ms(),
            requests_per_window: default_requests_per_window(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_lookup_delay_ms() -> u64 {
    3000
}

fn default_requests_per_window() -> u32 {
    900
}

fn default_window_secs() -> u64 {
    900
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Query parameters sent to the listing endpoint
///
/// Ordered so that generated URLs are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    params: BTreeMap<String, String>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full field selection requested for every timeline
    pub fn timeline_defaults() -> Self {
        Self::new()
            .with(PAGE_SIZE_PARAM, PAGE_SIZE.to_string())
            .with(
                "tweet.fields",
                "attachments,author_id,context_annotations,conversation_id,created_at,\
                 entities,geo,id,in_reply_to_user_id,lang,public_metrics,possibly_sensitive,\
                 referenced_tweets,reply_settings,source,text,withheld",
            )
            .with(
                "user.fields",
                "created_at,description,entities,id,location,name,pinned_tweet_id,\
                 profile_image_url,protected,public_metrics,url,username,verified,withheld",
            )
            .with(
                "expansions",
                "attachments.poll_ids,attachments.media_keys,author_id,\
                 entities.mentions.username,geo.place_id,in_reply_to_user_id,\
                 referenced_tweets.id,referenced_tweets.id.author_id",
            )
            .with(
                "media.fields",
                "duration_ms,height,media_key,preview_image_url,type,url,width,\
                 public_metrics,alt_text",
            )
            .with(
                "place.fields",
                "contained_within,country,country_code,full_name,geo,id,name,place_type",
            )
            .with(
                "poll.fields",
                "duration_minutes,end_datetime,id,options,voting_status",
            )
    }

    /// Add or replace a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Current continuation token, if any
    pub fn continuation_token(&self) -> Option<&str> {
        self.get(CONTINUATION_PARAM)
    }

    /// Store the token for the next page request
    pub fn set_continuation_token(&mut self, token: impl Into<String>) {
        self.insert(CONTINUATION_PARAM, token);
    }

    /// Check the preconditions for draining a timeline
    ///
    /// The caller must not seed a continuation token and the page size must
    /// be exactly [`PAGE_SIZE`].
    pub fn validate_for_pagination(&self) -> Result<()> {
        if self.contains(CONTINUATION_PARAM) {
            return Err(Error::config(format!(
                "The query parameters already include '{CONTINUATION_PARAM}'"
            )));
        }

        let page_size = self
            .get(PAGE_SIZE_PARAM)
            .ok_or_else(|| Error::config(format!("'{PAGE_SIZE_PARAM}' must be set to {PAGE_SIZE}")))?;

        match page_size.trim().parse::<u32>() {
            Ok(PAGE_SIZE) => Ok(()),
            _ => Err(Error::config(format!(
                "'{PAGE_SIZE_PARAM}' must be {PAGE_SIZE}, got '{page_size}'"
            ))),
        }
    }
}
