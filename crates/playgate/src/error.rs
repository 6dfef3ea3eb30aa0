// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for the playgate API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateError {
    MissingParameter,
    Unauthorized,
    ClientNotFound,
    RegistryUnavailable,
    UpstreamFetchFailed,
    CleanupDisabled,
    Internal,
}

impl GateError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingParameter => 400,
            Self::Unauthorized => 401,
            Self::ClientNotFound => 404,
            Self::RegistryUnavailable => 503,
            Self::UpstreamFetchFailed => 502,
            Self::CleanupDisabled => 400,
            Self::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ClientNotFound => "CLIENT_NOT_FOUND",
            Self::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            Self::UpstreamFetchFailed => "UPSTREAM_FETCH_FAILED",
            Self::CleanupDisabled => "CLEANUP_DISABLED",
            Self::Internal => "INTERNAL",
        }
    }

    pub fn to_error_body(&self, message: impl Into<String>) -> ErrorBody {
        ErrorBody { code: self.as_str().to_owned(), message: message.into() }
    }

    pub fn to_http_response(
        &self,
        message: impl Into<String>,
    ) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse { error: self.to_error_body(message) };
        (status, Json(body))
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error body with machine-readable code and human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
