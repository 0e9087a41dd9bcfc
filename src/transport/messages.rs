//! JSON bodies exchanged with the name server, sequencer and replicas

use serde::{Deserialize, Serialize};

use crate::client::{ReplicaEntry, SequenceNumber};

// === Name server ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub servers: Vec<ReplicaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub service: String,
    pub qualifier: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub service: String,
    pub address: String,
}

// === Sequencer ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceResponse {
    pub seq: SequenceNumber,
}

// === Replicas ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub tuple: String,
    pub seq: SequenceNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeRequest {
    pub pattern: String,
    pub seq: SequenceNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TupleResponse {
    pub tuple: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub tuples: Vec<String>,
}
