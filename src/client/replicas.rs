//! Known replicas for the current discovery epoch

use serde::{Deserialize, Serialize};

use crate::common::Result;

/// One replica as registered at the name server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaEntry {
    pub address: String,
    pub qualifier: String,
}

impl ReplicaEntry {
    pub fn new(address: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            qualifier: qualifier.into(),
        }
    }
}

impl std::fmt::Display for ReplicaEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.qualifier, self.address)
    }
}

/// Name-resolution collaborator
#[async_trait::async_trait]
pub trait Discovery: Send + Sync {
    /// Replicas registered under `service`, optionally filtered by qualifier.
    ///
    /// Fails with `Error::DiscoveryUnavailable` or `Error::NoReplicasFound`.
    async fn lookup(&self, service: &str, qualifier: Option<&str>) -> Result<Vec<ReplicaEntry>>;
}

/// Ordered set of replicas; empty means "rediscover before use".
///
/// Membership is only ever replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct ReplicaSet {
    entries: Vec<ReplicaEntry>,
}

impl ReplicaSet {
    pub fn new(entries: Vec<ReplicaEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&ReplicaEntry> {
        self.entries.get(index)
    }

    /// Position of the replica with this qualifier
    pub fn position(&self, qualifier: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.qualifier == qualifier)
    }

    pub fn by_qualifier(&self, qualifier: &str) -> Option<&ReplicaEntry> {
        self.position(qualifier).and_then(|i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[ReplicaEntry] {
        &self.entries
    }

    /// Swap in a new epoch's membership
    pub fn replace(&mut self, entries: Vec<ReplicaEntry>) {
        self.entries = entries;
    }

    /// Forget every replica
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
