//! Tests for the auth module

use super::*;
use crate::error::Error;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_read_first_line_trimmed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bearer_token.txt");
    fs::write(&path, "  AAAA%2Btoken  \nsecond line\n").unwrap();

    let credential = read_bearer_token(&path).unwrap();
    assert_eq!(credential.token(), "AAAA%2Btoken");
}

#[test]
fn test_read_single_line_without_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token");
    fs::write(&path, "abc123").unwrap();

    assert_eq!(read_bearer_token(&path).unwrap().token(), "abc123");
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = read_bearer_token(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "\n").unwrap();

    let err = read_bearer_token(&path).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_debug_is_redacted() {
    let credential = Credential::new("super-secret");
    let debug = format!("{credential:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("redacted"));
}

#[test]
fn test_apply_sets_bearer_header() {
    let credential = Credential::new("my-token");
    let client = reqwest::Client::new();
    let req = credential.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-token"
    );
}
