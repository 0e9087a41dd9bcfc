//! HTTP/JSON stubs for the name server, the sequencer and the replicas
//!
//! | Service     | Endpoint                                | Body                         |
//! |-------------|-----------------------------------------|------------------------------|
//! | name server | `GET /lookup?service=..&qualifier=..`   | → `LookupResponse`           |
//! | name server | `POST /register`, `POST /delete`        | `RegisterRequest`, `DeleteRequest` |
//! | sequencer   | `POST /next`                            | → `SequenceResponse`         |
//! | replica     | `POST /put`, `/read`, `/take`           | `PutRequest`, `ReadRequest`, `TakeRequest` |
//! | replica     | `GET /state`                            | → `StateResponse`            |

pub mod messages;
pub mod name_server;
pub mod replica;
pub mod sequencer;

pub use name_server::NameServerClient;
pub use replica::HttpReplicaClient;
pub use sequencer::SequencerClient;

/// Body of a non-2xx response, for error messages
async fn error_body(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
