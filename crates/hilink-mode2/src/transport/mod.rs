//! Capability interface over the vendor exchange queues
//!
//! The vendor SDK offers exactly two operations: push a request, pop a
//! response. Nothing else in the bridge touches the queues directly; the
//! [`Mode2Client`](crate::Mode2Client) is the only caller and enforces
//! single-flight access above this trait.
//!
//! # Example
//!
//! ```ignore
//! use hilink_mode2::{create_transport, TransportConfig};
//!
//! let queues = create_transport(&TransportConfig::default(), None)?;
//! queues.enqueue(request).await?;
//! let response = queues.try_dequeue().await?;
//! ```

pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use hilink_core::{RequestMessage, ResponseMessage};

use crate::config::TransportConfig;
use crate::TransportError;

/// The vendor request/response queue pair
#[async_trait]
pub trait ExchangeQueues: Send + Sync {
    /// Push a request onto the vendor request queue.
    ///
    /// There is no retraction: once enqueued, the vendor SDK will act on it.
    async fn enqueue(&self, request: RequestMessage) -> Result<(), TransportError>;

    /// Pop the head of the response queue, if any
    async fn try_dequeue(&self) -> Result<Option<ResponseMessage>, TransportError>;

    /// Number of responses currently waiting on the response queue
    async fn pending_responses(&self) -> usize;
}

/// Create the exchange queues described by the configuration
pub fn create_transport(
    config: &TransportConfig,
    activation_serial: Option<&str>,
) -> Result<Arc<dyn ExchangeQueues>, TransportError> {
    match config {
        TransportConfig::Mock(cfg) => {
            cfg.validate()?;
            let queues = mock::MockExchange::new(cfg, activation_serial);
            Ok(Arc::new(queues))
        }
    }
}
