//! Exchange queue errors

use hilink_core::BridgeError;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("Exchange queues closed")]
    Closed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<TransportError> for BridgeError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidConfig(msg) => BridgeError::Internal(msg),
            other => BridgeError::Transport(other.to_string()),
        }
    }
}
