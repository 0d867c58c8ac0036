//! Authentication module
//!
//! Loads the static bearer token used for every API call and attaches it
//! to outgoing requests. No token exchange or refresh is performed.

mod credential;

pub use credential::{read_bearer_token, Credential, DEFAULT_TOKEN_FILE};

#[cfg(test)]
mod tests;
