// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP reader for the client registry file.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::RwLock;

use crate::registry::Snapshot;

/// Why a registry read produced no snapshot.
#[derive(Debug)]
pub enum RegistryError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
    Malformed(serde_json::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "registry request failed: {e}"),
            Self::Status(s) => write!(f, "registry returned {s}"),
            Self::Malformed(e) => write!(f, "registry payload malformed: {e}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Reads the full client snapshot from a fixed raw-file URL.
///
/// With a TTL set, a successful snapshot is reused until it is older than
/// the TTL. Failures are never cached.
pub struct RegistryClient {
    url: String,
    client: Client,
    ttl: Option<Duration>,
    cached: RwLock<Option<(Instant, Arc<Snapshot>)>>,
}

impl RegistryClient {
    pub fn new(url: String, client: Client, ttl: Option<Duration>) -> Self {
        Self { url, client, ttl, cached: RwLock::new(None) }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current snapshot. Never retries and never returns a partial list.
    pub async fn fetch_clients(&self) -> Result<Arc<Snapshot>, RegistryError> {
        if let Some(ttl) = self.ttl {
            if let Some((at, snapshot)) = self.cached.read().await.as_ref() {
                if at.elapsed() < ttl {
                    return Ok(Arc::clone(snapshot));
                }
            }
        }

        let snapshot = Arc::new(self.fetch_fresh().await?);
        if self.ttl.is_some() {
            *self.cached.write().await = Some((Instant::now(), Arc::clone(&snapshot)));
        }
        Ok(snapshot)
    }

    async fn fetch_fresh(&self) -> Result<Snapshot, RegistryError> {
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(RegistryError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }
        let bytes = resp.bytes().await.map_err(RegistryError::Transport)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(RegistryError::Malformed)?;
        tracing::debug!(clients = snapshot.len(), "registry snapshot fetched");
        Ok(snapshot)
    }
}
