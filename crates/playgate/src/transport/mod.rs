// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the playlist gateway.

pub mod auth;
pub mod http;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::GateState;

/// Build the axum `Router` with all gateway routes.
pub fn build_router(state: Arc<GateState>) -> Router {
    let admin = Router::new()
        .route("/api/v1/cleanup", post(http::trigger_cleanup))
        .layer(middleware::from_fn_with_state(state.clone(), auth::admin_auth_layer));

    let router = Router::new()
        // Health (no auth)
        .route("/api/v1/health", get(http::health))
        // Delivery (identified by phone only)
        .route("/playlist", get(http::playlist))
        .merge(admin);

    with_middleware(router).with_state(state)
}

/// Panic recovery, request tracing, and CORS, shared by every route.
pub(crate) fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(http::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
