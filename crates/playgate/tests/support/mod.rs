// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: an in-process stand-in for the raw file host,
//! the playlist sources, and the repository contents API.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use chrono::{TimeDelta, Utc};
use tokio_util::sync::CancellationToken;

use playgate::config::GateConfig;
use playgate::state::GateState;

pub const OWNER: &str = "acme";
pub const REPO: &str = "iptv";
pub const TRIAL_BODY: &[u8] = b"#EXTM3U\n#EXTINF:-1,Trial\nhttp://cdn/trial.ts\n";

/// Registry entry with a registration `minutes_ago` minutes before now.
pub fn client(phone: &str, minutes_ago: Option<i64>) -> serde_json::Value {
    match minutes_ago {
        Some(m) => serde_json::json!({
            "phone": phone,
            "registration_date": (Utc::now() - TimeDelta::minutes(m)).to_rfc3339(),
        }),
        None => serde_json::json!({ "phone": phone }),
    }
}

/// Full playlist body for `phone`.
pub fn full_body(phone: &str) -> Vec<u8> {
    format!("#EXTM3U\n#EXTINF:-1,Full {phone}\nhttp://cdn/{phone}.ts\n").into_bytes()
}

/// Mutable upstream behavior plus hit counters.
#[derive(Default)]
pub struct Upstream {
    /// Raw registry body. `None` makes the registry return 500.
    pub registry: Mutex<Option<String>>,
    pub registry_hits: AtomicU32,
    /// Playlist path -> (status, body).
    pub playlists: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    pub playlist_hits: AtomicU32,
    /// Repository path -> blob hash.
    pub artifacts: Mutex<HashMap<String, String>>,
    /// Paths whose delete returns 500.
    pub failing_deletes: Mutex<HashSet<String>>,
    /// Every DELETE received, in arrival order.
    pub delete_calls: Mutex<Vec<String>>,
    pub auth_headers: Mutex<Vec<String>>,
}

impl Upstream {
    pub fn set_clients(&self, clients: &[serde_json::Value]) {
        let body = serde_json::Value::Array(clients.to_vec()).to_string();
        *lock(&self.registry) = Some(body);
    }

    pub fn set_registry_raw(&self, body: Option<&str>) {
        *lock(&self.registry) = body.map(str::to_owned);
    }

    pub fn set_playlist(&self, path: &str, status: u16, body: &[u8]) {
        lock(&self.playlists).insert(path.to_owned(), (status, body.to_vec()));
    }

    pub fn add_artifact(&self, path: &str, sha: &str) {
        lock(&self.artifacts).insert(path.to_owned(), sha.to_owned());
    }

    pub fn fail_delete(&self, path: &str) {
        lock(&self.failing_deletes).insert(path.to_owned());
    }

    pub fn has_artifact(&self, path: &str) -> bool {
        lock(&self.artifacts).contains_key(path)
    }

    pub fn deletes(&self) -> Vec<String> {
        lock(&self.delete_calls).clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        lock(&self.auth_headers).clone()
    }

    pub fn registry_hits(&self) -> u32 {
        self.registry_hits.load(Ordering::SeqCst)
    }

    pub fn playlist_hits(&self) -> u32 {
        self.playlist_hits.load(Ordering::SeqCst)
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

async fn dispatch(
    State(up): State<Arc<Upstream>>,
    method: Method,
    uri: Uri,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();
    let registry_path = format!("/raw/{OWNER}/{REPO}/main/public/clients.json");
    let contents_prefix = format!("/api/repos/{OWNER}/{REPO}/contents/");

    if path == registry_path {
        up.registry_hits.fetch_add(1, Ordering::SeqCst);
        return match lock(&up.registry).clone() {
            Some(body) => (StatusCode::OK, body).into_response(),
            None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
    }

    if let Some(repo_path) = path.strip_prefix(&contents_prefix) {
        if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            lock(&up.auth_headers).push(auth.to_owned());
        }
        return contents(&up, &method, repo_path, &body);
    }

    up.playlist_hits.fetch_add(1, Ordering::SeqCst);
    match lock(&up.playlists).get(path).cloned() {
        Some((status, body)) => {
            (StatusCode::from_u16(status).unwrap_or(StatusCode::OK), body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn contents(up: &Upstream, method: &Method, repo_path: &str, body: &[u8]) -> Response {
    match *method {
        Method::GET => match lock(&up.artifacts).get(repo_path) {
            Some(sha) => axum::Json(serde_json::json!({ "path": repo_path, "sha": sha }))
                .into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Method::DELETE => {
            lock(&up.delete_calls).push(repo_path.to_owned());
            if lock(&up.failing_deletes).contains(repo_path) {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            let sha = serde_json::from_slice::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v["sha"].as_str().map(str::to_owned));
            let mut artifacts = lock(&up.artifacts);
            let current = artifacts.get(repo_path).cloned();
            match current {
                None => StatusCode::NOT_FOUND.into_response(),
                Some(current) if Some(current.as_str()) != sha.as_deref() => {
                    StatusCode::CONFLICT.into_response()
                }
                Some(_) => {
                    artifacts.remove(repo_path);
                    StatusCode::OK.into_response()
                }
            }
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Start the fake upstream on an ephemeral port and return its base URL.
pub async fn spawn_upstream(up: Arc<Upstream>) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().fallback(dispatch).with_state(up);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// Gateway config pointing every upstream at `base`.
pub fn test_config(base: &str) -> GateConfig {
    GateConfig {
        host: "127.0.0.1".into(),
        port: 0,
        auth_token: None,
        github_owner: OWNER.into(),
        github_repo: REPO.into(),
        github_branch: "main".into(),
        clients_file_path: "public/clients.json".into(),
        raw_base_url: format!("{base}/raw"),
        api_base_url: format!("{base}/api"),
        base_url: format!("{base}/lists/"),
        test_duration_ms: 5 * 60 * 1000,
        test_playlist_url: Some(format!("{base}/trial.m3u8")),
        trial_artifact_dir: "public".into(),
        github_token: Some("ghp_test".into()),
        cleanup_interval_ms: 0,
        cleanup_concurrency: 4,
        fetch_timeout_ms: 5000,
        registry_cache_ms: 0,
    }
}

pub fn test_state(config: GateConfig) -> anyhow::Result<Arc<GateState>> {
    Ok(Arc::new(GateState::new(config, CancellationToken::new())?))
}

/// Fake upstream with the trial playlist already in place.
pub async fn upstream() -> anyhow::Result<(Arc<Upstream>, String)> {
    let up = Arc::new(Upstream::default());
    up.set_playlist("/trial.m3u8", 200, TRIAL_BODY);
    let base = spawn_upstream(Arc::clone(&up)).await?;
    Ok((up, base))
}
