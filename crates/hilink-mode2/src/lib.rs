//! hilink-mode2 - Correlation client for the Hi-Link Mode2 SDK
//!
//! The vendor SDK exposes two unordered queues: one for requests, one for
//! responses. Nothing ties a response to the request that caused it except
//! the machine UID and the request kind. This crate turns that into an
//! awaitable request/reply call.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Mode2Client                            │
//! │  exchange lock (FIFO) ── one request in flight per process  │
//! │                                                             │
//! │   request() ─► enqueue ─► poll every 10 ms ─► match (uid,   │
//! │                                               kind) or time │
//! │                          │                                  │
//! │                 ┌────────┴────────┐                         │
//! │                 │ ExchangeQueues  │                         │
//! │                 │ (vendor / mock) │                         │
//! │                 └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{CommandOutcome, MachineListOutcome, Mode2Client};
pub use config::{ClientConfig, MockConfig, MockMachineConfig, TransportConfig};
pub use error::TransportError;
pub use transport::{create_transport, ExchangeQueues};

pub use hilink_core::{
    BridgeError, BridgeResult, CollectDataType, RequestData, RequestMessage, ResponseData,
    ResponseMessage,
};
