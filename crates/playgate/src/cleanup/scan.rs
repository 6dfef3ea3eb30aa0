// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expiry scan over a registry snapshot.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::entitlement;
use crate::naming;
use crate::registry::Snapshot;

/// A client whose trial window has closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredClient<'a> {
    pub phone: &'a str,
}

impl ExpiredClient<'_> {
    /// Repository path of this client's trial artifact.
    pub fn artifact_path(&self, dir: &str) -> String {
        naming::trial_artifact_path(dir, self.phone)
    }
}

/// Clients in `snapshot` whose trial window has closed at `now`, in snapshot order.
///
/// The iterator is lazy and can be cloned to restart the scan.
pub fn find_expired(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    trial_window: Duration,
) -> impl Iterator<Item = ExpiredClient<'_>> + Clone + '_ {
    snapshot
        .clients()
        .iter()
        .filter(move |record| entitlement::is_expired(record, now, trial_window))
        .map(|record| ExpiredClient { phone: &record.phone })
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
