// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client registry: record types and the snapshot reader.

pub mod client;

use serde::{Deserialize, Serialize};

/// Raw registration timestamp as stored in the registry file.
///
/// The registry is edited by hand, so both ISO-style strings and epoch
/// milliseconds show up in practice. Any other JSON value is kept as-is so
/// one bad entry never fails the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistrationDate {
    EpochMillis(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RegistrationDate {
    /// An empty string carries no timestamp.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::EpochMillis(_) | Self::Other(_) => false,
        }
    }
}

/// One registered client. Read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub phone: String,
    #[serde(default)]
    pub registration_date: Option<RegistrationDate>,
}

impl ClientRecord {
    /// Registration timestamp, treating blank values as absent.
    pub fn registration(&self) -> Option<&RegistrationDate> {
        self.registration_date.as_ref().filter(|d| !d.is_blank())
    }
}

/// Ordered registry contents at the time of one read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    clients: Vec<ClientRecord>,
}

impl Snapshot {
    pub fn new(clients: Vec<ClientRecord>) -> Self {
        Self { clients }
    }

    /// Look up a client by phone. Duplicate phones resolve to the first entry.
    pub fn find(&self, phone: &str) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.phone == phone)
    }

    pub fn clients(&self) -> &[ClientRecord] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
