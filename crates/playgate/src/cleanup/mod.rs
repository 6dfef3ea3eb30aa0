// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trial artifact cleanup: scan the registry, delete expired artifacts.

pub mod scan;
pub mod schedule;
pub mod store;

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use crate::registry::Snapshot;
use crate::state::GateState;
use scan::find_expired;
use store::{ArtifactStore, CurrentHash, DeleteOutcome};

/// What happened to one expired client's artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ArtifactOutcome {
    Deleted,
    /// Nothing to delete: never provisioned or already removed.
    Absent,
    /// The artifact changed between hash lookup and delete.
    Conflict,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactResult {
    pub phone: String,
    pub path: String,
    #[serde(flatten)]
    pub outcome: ArtifactOutcome,
}

/// Aggregate result of one cleanup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub expired: usize,
    pub deleted: usize,
    pub absent: usize,
    pub conflicts: usize,
    pub failed: usize,
    pub results: Vec<ArtifactResult>,
}

impl CleanupReport {
    fn record(&mut self, result: ArtifactResult) {
        match result.outcome {
            ArtifactOutcome::Deleted => self.deleted += 1,
            ArtifactOutcome::Absent => self.absent += 1,
            ArtifactOutcome::Conflict => self.conflicts += 1,
            ArtifactOutcome::Failed { .. } => self.failed += 1,
        }
        self.results.push(result);
    }

    /// True when no artifact deletion failed outright.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Why a cleanup run did not start.
#[derive(Debug)]
pub enum CleanupError {
    Disabled,
    Registry(crate::registry::client::RegistryError),
}

impl std::fmt::Display for CleanupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("cleanup disabled: no contents API token configured"),
            Self::Registry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CleanupError {}

/// Options for one pass over a snapshot.
#[derive(Debug, Clone)]
pub struct CleanupPlan {
    pub trial_window: Duration,
    pub artifact_dir: String,
    pub concurrency: usize,
}

/// Remove one artifact: look up its hash, then delete by that hash.
pub async fn clean_artifact(store: &ArtifactStore, path: &str) -> ArtifactOutcome {
    let sha = match store.current_hash(path).await {
        Ok(CurrentHash::Present(sha)) => sha,
        Ok(CurrentHash::Absent) => return ArtifactOutcome::Absent,
        Err(e) => return ArtifactOutcome::Failed { reason: format!("hash lookup failed: {e}") },
    };
    match store.delete(path, &sha).await {
        DeleteOutcome::Deleted => ArtifactOutcome::Deleted,
        DeleteOutcome::NotFound => ArtifactOutcome::Absent,
        DeleteOutcome::Conflict => ArtifactOutcome::Conflict,
        DeleteOutcome::Failed(reason) => ArtifactOutcome::Failed { reason },
    }
}

/// Delete the trial artifact of every expired client in `snapshot`.
///
/// Each artifact is attempted at most once per call. A failure is recorded in
/// the report and the remaining artifacts are still attempted.
pub async fn clean_snapshot(
    store: &ArtifactStore,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    plan: &CleanupPlan,
) -> CleanupReport {
    let mut seen = HashSet::new();
    let targets: Vec<(String, String)> = find_expired(snapshot, now, plan.trial_window)
        .map(|c| (c.phone.to_owned(), c.artifact_path(&plan.artifact_dir)))
        .filter(|(_, path)| seen.insert(path.clone()))
        .collect();

    let mut report = CleanupReport { expired: targets.len(), ..Default::default() };
    let results: Vec<ArtifactResult> = stream::iter(targets)
        .map(|(phone, path)| async move {
            let outcome = clean_artifact(store, &path).await;
            match &outcome {
                ArtifactOutcome::Deleted => {
                    tracing::info!(phone = %phone, path = %path, "deleted expired trial artifact")
                }
                ArtifactOutcome::Absent => {
                    tracing::debug!(phone = %phone, path = %path, "trial artifact already absent")
                }
                ArtifactOutcome::Conflict => {
                    tracing::warn!(
                        phone = %phone,
                        path = %path,
                        "trial artifact changed before delete"
                    );
                }
                ArtifactOutcome::Failed { reason } => {
                    tracing::warn!(
                        phone = %phone,
                        path = %path,
                        err = %reason,
                        "trial artifact delete failed"
                    );
                }
            }
            ArtifactResult { phone, path, outcome }
        })
        .buffered(plan.concurrency.max(1))
        .collect()
        .await;

    for result in results {
        report.record(result);
    }
    report
}

/// Run one full cleanup pass against the configured registry and store.
pub async fn run_cleanup(state: &GateState) -> Result<CleanupReport, CleanupError> {
    let store = state.store.as_ref().ok_or(CleanupError::Disabled)?;
    let snapshot = state.registry.fetch_clients().await.map_err(CleanupError::Registry)?;
    let plan = CleanupPlan {
        trial_window: state.config.trial_window(),
        artifact_dir: state.config.trial_artifact_dir.clone(),
        concurrency: state.config.cleanup_concurrency,
    };

    let report = clean_snapshot(store, &snapshot, Utc::now(), &plan).await;
    tracing::info!(
        clients = snapshot.len(),
        expired = report.expired,
        deleted = report.deleted,
        absent = report.absent,
        conflicts = report.conflicts,
        failed = report.failed,
        "cleanup finished"
    );
    Ok(report)
}
