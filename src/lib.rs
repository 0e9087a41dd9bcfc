//! # tuplespaces
//!
//! Client for a replicated tuple space:
//! - Sequence numbers from a sequencer totally order `put`/`take`
//! - Ordered-delay dispatch staggers requests across replicas
//! - A response collector turns concurrent replies into one decision
//! - Rediscover-and-retry once when a replica fails
//!
//! ## Architecture
//!
//! ```text
//!          ┌──────────────┐        ┌─────────────┐
//!          │ Name server  │        │  Sequencer  │
//!          └──────▲───────┘        └──────▲──────┘
//!                 │ lookup                │ next
//!          ┌──────┴───────────────────────┴──────┐
//!          │            Coordinator              │
//!          │  scheduler ─▶ tasks ─▶ collector    │
//!          └───────┬──────────┬──────────┬───────┘
//!                  │ +0s      │ +1s      │ +2s
//!             ┌────▼───┐ ┌────▼───┐ ┌────▼───┐
//!             │   A    │ │   B    │ │   C    │
//!             └────────┘ └────────┘ └────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! tuplespaces-client --name-server http://localhost:5001 --sequencer http://localhost:8080
//! > put <a,1>
//! OK
//!
//! > read <a,*>
//! OK
//! <a,1>
//!
//! > setdelay A 3
//! > getTupleSpacesState A
//! ```

pub mod client;
pub mod common;
pub mod transport;

// Re-export commonly used types
pub use client::{Coordinator, OperationKind, Outcome};
pub use common::{ClientConfig, Error, Result};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
