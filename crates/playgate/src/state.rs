// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio_util::sync::CancellationToken;

use crate::cleanup::store::{ArtifactStore, StoreConfig};
use crate::config::GateConfig;
use crate::outbound::http_client;
use crate::proxy::ContentProxy;
use crate::registry::client::RegistryClient;

/// Shared gateway state. Immutable after construction.
pub struct GateState {
    pub config: GateConfig,
    pub registry: RegistryClient,
    pub proxy: ContentProxy,
    /// Present only when a contents API token is configured.
    pub store: Option<ArtifactStore>,
    pub shutdown: CancellationToken,
}

impl GateState {
    pub fn new(config: GateConfig, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let client = http_client(config.fetch_timeout())?;

        let registry =
            RegistryClient::new(config.registry_url(), client.clone(), config.registry_cache_ttl());
        let proxy = ContentProxy::new(
            client.clone(),
            config.base_url.clone(),
            config.test_playlist_url.clone(),
        );
        let store = config.github_token.as_ref().filter(|t| !t.is_empty()).map(|token| {
            let store_config = StoreConfig {
                api_base_url: config.api_base_url.clone(),
                owner: config.github_owner.clone(),
                repo: config.github_repo.clone(),
                branch: config.github_branch.clone(),
                token: token.clone(),
            };
            ArtifactStore::new(store_config, client.clone())
        });

        Ok(Self { config, registry, proxy, store, shutdown })
    }

    pub fn cleanup_enabled(&self) -> bool {
        self.store.is_some()
    }
}
