// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared HTTP client for registry, playlist, and contents API calls.

use std::time::Duration;

use reqwest::Client;

/// Install the rustls crypto provider (needed for reqwest even on plain HTTP).
pub fn ensure_crypto_provider() {
    // Already-installed is fine; only the first install wins.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Build the client every outbound call goes through.
///
/// `timeout` bounds each request end to end, since none of the upstreams
/// are under this service's control.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    ensure_crypto_provider();
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("playgate/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
