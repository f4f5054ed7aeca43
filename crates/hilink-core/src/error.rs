//! Common error types for the bridge

use thiserror::Error;

use crate::CollectDataType;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors produced while exchanging a request with the vendor SDK.
///
/// A non-zero vendor result code is not an error: it arrives inside a
/// successful exchange and is inspected by the caller.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Rejected before the exchange started
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No matching response arrived before the deadline
    #[error("No matching response within {timeout_ms} ms (uid={uid}, type={data_type})")]
    Timeout {
        uid: String,
        data_type: CollectDataType,
        timeout_ms: u64,
    },

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// The exchange queues failed
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// True for the "no matching response within deadline" failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
