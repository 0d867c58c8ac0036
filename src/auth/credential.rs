//! Bearer credential loading
//!
//! The token lives on the first line of a local text file.

use crate::error::{Error, Result};
use reqwest::RequestBuilder;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Default location of the token file
pub const DEFAULT_TOKEN_FILE: &str = "bearer_token.txt";

/// Opaque bearer token forwarded on every request
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The raw token value
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Attach the token as a bearer authorization header
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Read the bearer token from the first line of `path`, trimmed
pub fn read_bearer_token(path: impl AsRef<Path>) -> Result<Credential> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::file_not_found(path.display().to_string()),
        _ => Error::Io(e),
    })?;

    let token = contents.lines().next().unwrap_or_default().trim();
    if token.is_empty() {
        return Err(Error::config(format!(
            "Token file {} does not contain a token on its first line",
            path.display()
        )));
    }

    debug!("Loaded bearer token from {}", path.display());
    Ok(Credential::new(token))
}
