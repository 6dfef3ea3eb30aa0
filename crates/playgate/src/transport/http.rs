// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for playlist delivery and the admin API.

use std::any::Any;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cleanup::{run_cleanup, CleanupError};
use crate::entitlement::{self, Window};
use crate::error::GateError;
use crate::state::GateState;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub trial_enabled: bool,
    pub cleanup_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    #[serde(default)]
    pub phone: Option<String>,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<GateState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "running".to_owned(),
        trial_enabled: s.proxy.trial_available(),
        cleanup_enabled: s.cleanup_enabled(),
    })
}

/// `GET /playlist?phone=...` — resolve the client's variant and proxy the playlist.
pub async fn playlist(
    State(s): State<Arc<GateState>>,
    Query(q): Query<PlaylistQuery>,
) -> Response {
    let Some(phone) = q.phone.filter(|p| !p.is_empty()) else {
        return GateError::MissingParameter
            .to_http_response("query parameter \"phone\" is required")
            .into_response();
    };

    let snapshot = match s.registry.fetch_clients().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(url = %s.registry.url(), err = %e, "registry unavailable");
            return GateError::RegistryUnavailable
                .to_http_response("client registry temporarily unavailable")
                .into_response();
        }
    };

    let Some(record) = snapshot.find(&phone).filter(|r| r.registration().is_some()) else {
        tracing::info!(phone = %phone, "client not found or not registered");
        return GateError::ClientNotFound
            .to_http_response("client not found or has no registration date")
            .into_response();
    };

    let now = Utc::now();
    if let Window::Invalid(reason) = entitlement::window(record, now) {
        tracing::warn!(phone = %phone, %reason, "invalid registration, serving full playlist");
    }
    let variant =
        entitlement::resolve(record, now, s.config.trial_window(), s.proxy.trial_available());

    match s.proxy.deliver(variant, &phone).await {
        Ok(delivery) => {
            tracing::info!(
                phone = %phone,
                variant = ?delivery.variant,
                filename = %delivery.filename,
                bytes = delivery.body.len(),
                "playlist delivered"
            );
            delivery.into_response()
        }
        Err(e) => {
            tracing::warn!(phone = %phone, ?variant, err = %e, "playlist fetch failed");
            GateError::UpstreamFetchFailed
                .to_http_response("failed to fetch playlist from source")
                .into_response()
        }
    }
}

/// `POST /api/v1/cleanup` — run one cleanup pass and return its report.
pub async fn trigger_cleanup(State(s): State<Arc<GateState>>) -> Response {
    match run_cleanup(&s).await {
        Ok(report) => Json(report).into_response(),
        Err(e @ CleanupError::Disabled) => {
            GateError::CleanupDisabled.to_http_response(e.to_string()).into_response()
        }
        Err(CleanupError::Registry(e)) => {
            tracing::error!(err = %e, "cleanup aborted: registry unavailable");
            GateError::RegistryUnavailable.to_http_response(e.to_string()).into_response()
        }
    }
}

/// Map a handler panic to a well-formed 500.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "handler panicked");
    GateError::Internal.to_http_response("internal server error").into_response()
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
