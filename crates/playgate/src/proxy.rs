// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playlist fetch-and-forward.

use std::fmt;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::Client;

use crate::entitlement::Variant;
use crate::naming;

pub const PLAYLIST_CONTENT_TYPE: &str = "application/x-mpegurl";

/// Upstream location and download name for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub variant: Variant,
    pub url: String,
    pub filename: String,
}

/// Why a playlist could not be fetched.
#[derive(Debug)]
pub enum FetchError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "playlist request failed: {e}"),
            Self::Status(s) => write!(f, "playlist source returned {s}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A fetched playlist ready to hand back to the client.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub variant: Variant,
    pub filename: String,
    pub body: Bytes,
}

impl IntoResponse for Delivery {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        let headers = [
            (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE.to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ];
        (headers, self.body).into_response()
    }
}

/// Fetches trial or full playlists and packages them for download.
pub struct ContentProxy {
    client: Client,
    base_url: String,
    trial_url: Option<String>,
}

impl ContentProxy {
    pub fn new(client: Client, base_url: String, trial_url: Option<String>) -> Self {
        let trial_url = trial_url.filter(|u| !u.is_empty());
        Self { client, base_url, trial_url }
    }

    pub fn trial_available(&self) -> bool {
        self.trial_url.is_some()
    }

    /// Where `variant` is fetched from for `phone`.
    ///
    /// A trial request without a configured trial source falls back to the
    /// full playlist.
    pub fn target(&self, variant: Variant, phone: &str) -> Target {
        match (variant, &self.trial_url) {
            (Variant::Trial, Some(url)) => Target {
                variant: Variant::Trial,
                url: url.clone(),
                filename: naming::trial_filename(phone),
            },
            _ => Target {
                variant: Variant::Full,
                url: naming::full_playlist_url(&self.base_url, phone),
                filename: naming::full_filename(phone),
            },
        }
    }

    /// Fetch the playlist for `variant`. The whole body is read before
    /// returning, so a failure never yields partial bytes.
    pub async fn deliver(&self, variant: Variant, phone: &str) -> Result<Delivery, FetchError> {
        let target = self.target(variant, phone);
        let resp = self.client.get(&target.url).send().await.map_err(FetchError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = resp.bytes().await.map_err(FetchError::Transport)?;
        Ok(Delivery { variant: target.variant, filename: target.filename, body })
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
