//! Sequencer client

use reqwest::Client;

use crate::client::{SequenceNumber, SequenceSource};
use crate::common::{endpoint_url, Error, Result};
use crate::transport::error_body;
use crate::transport::messages::SequenceResponse;

#[derive(Debug, Clone)]
pub struct SequencerClient {
    base_url: String,
    http: Client,
}

impl SequencerClient {
    pub fn new(address: &str) -> Self {
        Self {
            base_url: endpoint_url(address),
            http: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl SequenceSource for SequencerClient {
    async fn next(&self) -> Result<SequenceNumber> {
        let resp = self
            .http
            .post(format!("{}/next", self.base_url))
            .send()
            .await
            .map_err(|e| Error::OrderingUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(Error::OrderingUnavailable(format!(
                "status {}: {}",
                status.as_u16(),
                error_body(resp).await
            )));
        }

        let body: SequenceResponse = resp
            .json()
            .await
            .map_err(|e| Error::OrderingUnavailable(format!("malformed reply: {}", e)))?;
        Ok(body.seq)
    }

    /// Drops the pooled connections along with the old client
    fn reset(&self) -> Box<dyn SequenceSource> {
        tracing::debug!("Reconnecting to sequencer at {}", self.base_url);
        Box::new(SequencerClient::new(&self.base_url))
    }
}
