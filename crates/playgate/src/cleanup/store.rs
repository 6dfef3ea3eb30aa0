// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository contents API client for trial artifacts.
//!
//! Deletes are hash-addressed: the caller first reads the artifact's current
//! blob hash, then presents it with the delete. A stale hash is rejected by
//! the store, which is what keeps overlapping cleanup runs from racing.

use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Result of looking up an artifact's current hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentHash {
    Present(String),
    Absent,
}

/// Result of one hash-addressed delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// The presented hash no longer matches the stored artifact.
    Conflict,
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    sha: String,
}

/// Connection details for one repository.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub api_base_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
}

/// Contents API client scoped to one repository and branch.
pub struct ArtifactStore {
    config: StoreConfig,
    client: Client,
}

impl ArtifactStore {
    pub fn new(config: StoreConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_start_matches('/'),
        )
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }

    /// Look up the blob hash currently stored at `path`.
    pub async fn current_hash(&self, path: &str) -> anyhow::Result<CurrentHash> {
        let url = format!("{}?ref={}", self.contents_url(path), self.config.branch);
        let resp = self.request(reqwest::Method::GET, url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(CurrentHash::Absent);
        }
        let entry: ContentEntry = resp.error_for_status()?.json().await?;
        Ok(CurrentHash::Present(entry.sha))
    }

    /// Delete `path` if it still has blob hash `sha`. Never returns an error;
    /// every failure is folded into [`DeleteOutcome`].
    pub async fn delete(&self, path: &str, sha: &str) -> DeleteOutcome {
        let body = serde_json::json!({
            "message": format!("Remove expired trial artifact {path}"),
            "sha": sha,
            "branch": self.config.branch,
        });
        let result =
            self.request(reqwest::Method::DELETE, self.contents_url(path)).json(&body).send().await;
        match result {
            Ok(resp) => match resp.status() {
                s if s.is_success() => DeleteOutcome::Deleted,
                StatusCode::NOT_FOUND => DeleteOutcome::NotFound,
                StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => DeleteOutcome::Conflict,
                s => DeleteOutcome::Failed(format!("store returned {s}")),
            },
            Err(e) => DeleteOutcome::Failed(e.to_string()),
        }
    }
}
