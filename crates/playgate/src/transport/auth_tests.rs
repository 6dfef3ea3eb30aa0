// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::{HeaderMap, HeaderValue};

use super::*;

fn headers(auth: Option<&str>) -> HeaderMap {
    let mut map = HeaderMap::new();
    if let Some(value) = auth {
        map.insert("authorization", HeaderValue::from_str(value).expect("valid header"));
    }
    map
}

#[test]
fn no_expected_token_allows_everything() {
    assert!(validate_bearer(&headers(None), None).is_ok());
}

#[yare::parameterized(
    missing = { None },
    wrong_scheme = { Some("Basic s3cret") },
    wrong_token = { Some("Bearer nope") },
    prefix_only = { Some("Bearer s3cre") },
)]
fn rejects_bad_credentials(auth: Option<&str>) {
    assert_eq!(validate_bearer(&headers(auth), Some("s3cret")), Err(GateError::Unauthorized));
}

#[test]
fn accepts_matching_token() {
    assert!(validate_bearer(&headers(Some("Bearer s3cret")), Some("s3cret")).is_ok());
}

#[yare::parameterized(
    lowercase_scheme = { "bearer s3cret" },
    uppercase_scheme = { "BEARER s3cret" },
    trailing_space = { "Bearer s3cret " },
)]
fn accepts_scheme_variants(auth: &str) {
    assert!(validate_bearer(&headers(Some(auth)), Some("s3cret")).is_ok());
}

#[test]
fn token_comparison_requires_equal_length() {
    assert!(tokens_match(b"abc", b"abc"));
    assert!(!tokens_match(b"abc", b"abd"));
    assert!(!tokens_match(b"abc", b"abcd"));
    assert!(!tokens_match(b"", b"a"));
}
