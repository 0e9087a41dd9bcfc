//! Replica client over HTTP

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{ReplicaClient, ReplicaEntry, RpcError, SequenceNumber};
use crate::common::endpoint_url;
use crate::transport::error_body;
use crate::transport::messages::{
    PutRequest, ReadRequest, StateResponse, TakeRequest, TupleResponse,
};

#[derive(Debug, Clone, Default)]
pub struct HttpReplicaClient {
    http: Client,
}

impl HttpReplicaClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    async fn post<B: Serialize>(
        &self,
        replica: &ReplicaEntry,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, RpcError> {
        let resp = self
            .http
            .post(format!("{}/{}", endpoint_url(&replica.address), path))
            .json(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        check(resp).await
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RpcError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let code = resp.status().as_u16();
    Err(RpcError::Status {
        code,
        message: error_body(resp).await,
    })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, RpcError> {
    resp.json().await.map_err(|e| RpcError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl ReplicaClient for HttpReplicaClient {
    async fn put(
        &self,
        replica: &ReplicaEntry,
        tuple: &str,
        seq: SequenceNumber,
    ) -> Result<(), RpcError> {
        let body = PutRequest {
            tuple: tuple.to_string(),
            seq,
        };
        self.post(replica, "put", &body).await?;
        Ok(())
    }

    async fn read(&self, replica: &ReplicaEntry, pattern: &str) -> Result<String, RpcError> {
        let body = ReadRequest {
            pattern: pattern.to_string(),
        };
        let resp: TupleResponse = decode(self.post(replica, "read", &body).await?).await?;
        Ok(resp.tuple)
    }

    async fn take(
        &self,
        replica: &ReplicaEntry,
        pattern: &str,
        seq: SequenceNumber,
    ) -> Result<String, RpcError> {
        let body = TakeRequest {
            pattern: pattern.to_string(),
            seq,
        };
        let resp: TupleResponse = decode(self.post(replica, "take", &body).await?).await?;
        Ok(resp.tuple)
    }

    async fn get_state(&self, replica: &ReplicaEntry) -> Result<Vec<String>, RpcError> {
        let resp = self
            .http
            .get(format!("{}/state", endpoint_url(&replica.address)))
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let resp: StateResponse = decode(check(resp).await?).await?;
        Ok(resp.tuples)
    }
}
