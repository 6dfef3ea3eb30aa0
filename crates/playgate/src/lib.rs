// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playgate: time-gated playlist delivery and trial artifact cleanup.

pub mod cleanup;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod naming;
pub mod outbound;
pub mod proxy;
pub mod registry;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::cleanup::schedule::spawn_cleanup_scheduler;
use crate::cleanup::CleanupReport;
use crate::config::GateConfig;
use crate::state::GateState;
use crate::transport::build_router;

/// Run the gateway server until shutdown.
pub async fn run(config: GateConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();
    let state = Arc::new(GateState::new(config.clone(), shutdown.clone())?);

    if !config.trial_enabled() {
        tracing::info!("no trial playlist configured, serving full playlists only");
    }
    match (state.cleanup_enabled(), config.cleanup_interval()) {
        (true, Some(interval)) => {
            tracing::info!(interval_ms = config.cleanup_interval_ms, "periodic cleanup enabled");
            spawn_cleanup_scheduler(Arc::clone(&state), interval);
        }
        (false, Some(_)) => {
            tracing::warn!("cleanup interval set but no contents API token, periodic cleanup off");
        }
        _ => {}
    }

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
                shutdown.cancel();
            }
        });
    }

    tracing::info!("playgate listening on {addr}");
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}

/// Run a single cleanup pass and return its report.
pub async fn run_cleanup_once(config: GateConfig) -> anyhow::Result<CleanupReport> {
    let state = GateState::new(config, CancellationToken::new())?;
    let report = cleanup::run_cleanup(&state).await?;
    Ok(report)
}
