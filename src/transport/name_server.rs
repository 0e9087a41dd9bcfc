//! Name server client: replica discovery and registration

use reqwest::Client;

use crate::client::{Discovery, ReplicaEntry};
use crate::common::{endpoint_url, Error, Result};
use crate::transport::error_body;
use crate::transport::messages::{DeleteRequest, LookupResponse, RegisterRequest};

#[derive(Debug, Clone)]
pub struct NameServerClient {
    base_url: String,
    http: Client,
}

impl NameServerClient {
    pub fn new(address: &str) -> Self {
        Self {
            base_url: endpoint_url(address),
            http: Client::new(),
        }
    }

    /// Announce a replica under `service`
    pub async fn register(&self, service: &str, qualifier: &str, address: &str) -> Result<()> {
        tracing::debug!(
            "register: service={}, qualifier={}, address={}",
            service,
            qualifier,
            address
        );
        let body = RegisterRequest {
            service: service.to_string(),
            qualifier: qualifier.to_string(),
            address: address.to_string(),
        };
        self.post("register", &body).await
    }

    /// Withdraw a replica previously registered under `service`
    pub async fn delete(&self, service: &str, address: &str) -> Result<()> {
        tracing::debug!("delete: service={}, address={}", service, address);
        let body = DeleteRequest {
            service: service.to_string(),
            address: address.to_string(),
        };
        self.post("delete", &body).await
    }

    async fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::DiscoveryUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(Error::DiscoveryUnavailable(format!(
                "{} failed with status {}: {}",
                path,
                status.as_u16(),
                error_body(resp).await
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Discovery for NameServerClient {
    async fn lookup(&self, service: &str, qualifier: Option<&str>) -> Result<Vec<ReplicaEntry>> {
        tracing::debug!("lookup: service={}, qualifier={:?}", service, qualifier);

        let mut request = self
            .http
            .get(format!("{}/lookup", self.base_url))
            .query(&[("service", service)]);
        if let Some(qualifier) = qualifier {
            request = request.query(&[("qualifier", qualifier)]);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::DiscoveryUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(Error::DiscoveryUnavailable(format!(
                "lookup failed with status {}: {}",
                status.as_u16(),
                error_body(resp).await
            )));
        }

        let body: LookupResponse = resp
            .json()
            .await
            .map_err(|e| Error::DiscoveryUnavailable(format!("malformed lookup reply: {}", e)))?;

        if body.servers.is_empty() {
            return Err(Error::NoReplicasFound {
                service: service.to_string(),
                qualifier: qualifier.unwrap_or_default().to_string(),
            });
        }
        Ok(body.servers)
    }
}
