// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Configuration for the playgate service.
///
/// Built once at startup and shared read-only by every component.
#[derive(Debug, Clone, clap::Args)]
pub struct GateConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "PLAYGATE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8888, env = "PLAYGATE_PORT")]
    pub port: u16,

    /// Bearer token for the admin API (cleanup trigger). If unset, auth is disabled.
    #[arg(long, env = "PLAYGATE_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Owner of the repository holding the client registry and trial artifacts.
    #[arg(long, env = "GITHUB_OWNER")]
    pub github_owner: String,

    /// Repository holding the client registry and trial artifacts.
    #[arg(long, env = "GITHUB_REPO")]
    pub github_repo: String,

    /// Branch the registry is read from and artifacts are deleted on.
    #[arg(long, default_value = "main", env = "GITHUB_BRANCH")]
    pub github_branch: String,

    /// Path of the client registry file inside the repository.
    #[arg(long, default_value = "public/clients.json", env = "CLIENTS_FILE_PATH")]
    pub clients_file_path: String,

    /// Base URL for raw repository file reads.
    #[arg(long, default_value = "https://raw.githubusercontent.com", env = "GITHUB_RAW_BASE_URL")]
    pub raw_base_url: String,

    /// Base URL for the repository contents API.
    #[arg(long, default_value = "https://api.github.com", env = "GITHUB_API_URL")]
    pub api_base_url: String,

    /// Base location of full playlists; `{base_url}{phone}.m3u` is fetched.
    #[arg(long, env = "BASE_URL")]
    pub base_url: String,

    /// Trial window in milliseconds, measured from registration.
    #[arg(long, default_value_t = 300_000, env = "TEST_DURATION_MS")]
    pub test_duration_ms: u64,

    /// Shared trial playlist source. If unset, every client gets the full playlist.
    #[arg(long, env = "TEST_PLAYLIST_URL")]
    pub test_playlist_url: Option<String>,

    /// Repository directory holding provisioned trial artifacts.
    #[arg(long, default_value = "public", env = "TRIAL_ARTIFACT_DIR")]
    pub trial_artifact_dir: String,

    /// Token for the contents API. If unset, cleanup is disabled.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Periodic cleanup interval in milliseconds (0 disables the background run).
    #[arg(long, default_value_t = 0, env = "PLAYGATE_CLEANUP_INTERVAL_MS")]
    pub cleanup_interval_ms: u64,

    /// Maximum concurrent artifact deletions within one cleanup run.
    #[arg(long, default_value_t = 4, env = "PLAYGATE_CLEANUP_CONCURRENCY")]
    pub cleanup_concurrency: usize,

    /// Deadline for every outbound request in milliseconds.
    #[arg(long, default_value_t = 10_000, env = "PLAYGATE_FETCH_TIMEOUT_MS")]
    pub fetch_timeout_ms: u64,

    /// Registry snapshot reuse window in milliseconds (0 fetches on every request).
    #[arg(long, default_value_t = 0, env = "PLAYGATE_REGISTRY_CACHE_MS")]
    pub registry_cache_ms: u64,
}

impl GateConfig {
    pub fn trial_window(&self) -> Duration {
        Duration::from_millis(self.test_duration_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn registry_cache_ttl(&self) -> Option<Duration> {
        match self.registry_cache_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn cleanup_interval(&self) -> Option<Duration> {
        match self.cleanup_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Whether the trial variant can be served at all.
    pub fn trial_enabled(&self) -> bool {
        self.test_playlist_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Raw URL of the client registry file.
    pub fn registry_url(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base_url.trim_end_matches('/'),
            self.github_owner,
            self.github_repo,
            self.github_branch,
            self.clients_file_path.trim_start_matches('/'),
        )
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
