//! Configuration for the tuplespaces client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::common::{Error, Result};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tuplespaces.toml";

/// Environment variable prefix (e.g. `TUPLESPACES_NAME_SERVER`)
pub const ENV_PREFIX: &str = "TUPLESPACES";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service name registered at the name server
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Restrict discovery to replicas with this qualifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,

    /// Name server base URL
    #[serde(default = "default_name_server")]
    pub name_server: String,

    /// Sequencer base URL
    #[serde(default = "default_sequencer")]
    pub sequencer: String,

    /// Whole-operation retries after a replica failure
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Stagger slot between consecutive replicas
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_service_name() -> String {
    "TupleSpaces".to_string()
}
fn default_name_server() -> String {
    "http://localhost:5001".to_string()
}
fn default_sequencer() -> String {
    "http://localhost:8080".to_string()
}
fn default_retries() -> u32 {
    1
}
fn default_stagger_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            qualifier: None,
            name_server: default_name_server(),
            sequencer: default_sequencer(),
            retries: default_retries(),
            stagger_ms: default_stagger_ms(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load from `path` (required when given) or `tuplespaces.toml` if
    /// present, then `TUPLESPACES_*` env overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: ClientConfig = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::InvalidConfig("service_name cannot be empty".into()));
        }
        if self.name_server.trim().is_empty() {
            return Err(Error::InvalidConfig("name_server cannot be empty".into()));
        }
        if self.sequencer.trim().is_empty() {
            return Err(Error::InvalidConfig("sequencer cannot be empty".into()));
        }
        Ok(())
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}
