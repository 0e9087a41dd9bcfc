//! Common utilities and types shared across tuplespaces

pub mod config;
pub mod error;
pub mod utils;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use utils::{endpoint_url, is_tuple_or_pattern, parse_seconds, random_client_id, validate_tuple};
