//! # Folio Gateway
//!
//! Persistence boundary of the portfolio editor.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ editor: session, reconciler, section store   │
//! └──────────────────────────────────────────────┘
//!                     ↓  PersistenceGateway
//! ┌──────────────────────┐  ┌────────────────────┐
//! │ MemoryGateway        │  │ HttpGateway        │
//! │ (tests, embedding)   │  │ (feature = "http") │
//! └──────────────────────┘  └────────────────────┘
//! ```
//!
//! Gateways never retry and never interpret results. Retry policy and the
//! meaning of `NotFound` belong to the caller.

mod error;
mod gateway;
mod memory;
pub mod wire;

#[cfg(feature = "http")]
mod http;

pub use error::{GatewayError, GatewayResult};
pub use gateway::PersistenceGateway;
pub use memory::{MemoryGateway, Operation, RecordedCall};

#[cfg(feature = "http")]
pub use http::HttpGateway;
