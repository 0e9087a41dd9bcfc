//! Replica operation surface
//!
//! A trait in the client core, with the HTTP implementation living in
//! `transport::replica`.

use crate::client::operation::OperationKind;
use crate::client::replicas::ReplicaEntry;
use crate::client::sequencer::SequenceNumber;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("status {code}: {message}")]
    Status { code: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Calls a client can make on a single replica
#[async_trait::async_trait]
pub trait ReplicaClient: Send + Sync + 'static {
    async fn put(
        &self,
        replica: &ReplicaEntry,
        tuple: &str,
        seq: SequenceNumber,
    ) -> Result<(), RpcError>;

    async fn read(&self, replica: &ReplicaEntry, pattern: &str) -> Result<String, RpcError>;

    async fn take(
        &self,
        replica: &ReplicaEntry,
        pattern: &str,
        seq: SequenceNumber,
    ) -> Result<String, RpcError>;

    async fn get_state(&self, replica: &ReplicaEntry) -> Result<Vec<String>, RpcError>;
}

/// One in-flight RPC, owned by the task that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub operation: OperationKind,
    pub qualifier: String,
    pub address: String,
}

impl PendingCall {
    pub fn new(operation: OperationKind, replica: &ReplicaEntry) -> Self {
        Self {
            operation,
            qualifier: replica.qualifier.clone(),
            address: replica.address.clone(),
        }
    }
}

/// A failed call together with where it went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaFailure {
    pub call: PendingCall,
    pub error: RpcError,
}

impl std::fmt::Display for ReplicaFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on replica {} ({}): {}",
            self.call.operation, self.call.qualifier, self.call.address, self.error
        )
    }
}
