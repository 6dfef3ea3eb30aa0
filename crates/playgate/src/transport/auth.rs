// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::GateError;
use crate::state::GateState;

/// Compare two tokens without short-circuiting on the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given.iter().zip(expected).fold(0u8, |diff, (g, e)| diff | (g ^ e)) == 0
}

/// Extract the credential of an `Authorization: Bearer <token>` header.
///
/// The scheme name is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Check the admin credential. With no configured token every request passes.
pub fn validate_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), GateError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match bearer_token(headers) {
        Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => Err(GateError::Unauthorized),
    }
}

/// Middleware guarding the admin routes.
///
/// Playlist delivery and health stay public: clients identify by phone
/// number only.
pub async fn admin_auth_layer(
    State(state): State<Arc<GateState>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match validate_bearer(req.headers(), state.config.auth_token.as_deref()) {
        Ok(()) => next.run(req).await,
        Err(code) => {
            tracing::debug!(path = %req.uri().path(), "rejected admin request");
            code.to_http_response("missing or invalid bearer token").into_response()
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
