// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background task that runs cleanup on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cleanup::run_cleanup;
use crate::state::GateState;

/// Spawn a single background task that periodically runs cleanup.
///
/// Runs never overlap within the task; a run that outlasts the interval
/// causes the missed ticks to be skipped. The task ends once
/// `state.shutdown` is cancelled.
pub fn spawn_cleanup_scheduler(state: Arc<GateState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                _ = timer.tick() => {}
            }

            match run_cleanup(&state).await {
                Ok(report) if !report.is_success() => {
                    tracing::warn!(failed = report.failed, "cleanup run finished with failures");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(err = %e, "cleanup run skipped"),
            }
        }
        tracing::debug!("cleanup scheduler stopped");
    })
}
