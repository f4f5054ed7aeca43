//! Single-flight correlation client
//!
//! Turns "enqueue a request, poll the shared response queue until a response
//! with the same UID and kind appears" into an awaitable call. The exchange
//! lock is held for the whole enqueue-plus-poll sequence, so at most one
//! request is ever in flight and a popped response can only belong to the
//! current waiter or to nobody.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hilink_core::models::{MachineIpInfo, MachineInfoList};
use hilink_core::{
    reply_succeeded, BridgeError, BridgeResult, CollectDataType, RequestData, RequestMessage,
    ResponseData,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::transport::ExchangeQueues;

/// Outcome of a fixed machine-management command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i32>,
}

impl CommandOutcome {
    fn from_response(data_type: CollectDataType, data: &ResponseData) -> Self {
        let result_code = data.result_code();
        Self {
            success: reply_succeeded(data_type, result_code),
            result_code,
        }
    }
}

/// Reply to GetMachineList
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineListOutcome {
    pub success: bool,
    pub result_code: Option<i32>,
    /// Empty when the vendor refused the request
    pub machines: Vec<MachineIpInfo>,
}

/// Correlation client over the vendor exchange queues
pub struct Mode2Client {
    queues: Arc<dyn ExchangeQueues>,
    /// tokio's Mutex grants the lock in request order
    exchange: Mutex<()>,
    config: ClientConfig,
}

impl Mode2Client {
    pub fn new(queues: Arc<dyn ExchangeQueues>, config: ClientConfig) -> Self {
        Self {
            queues,
            exchange: Mutex::new(()),
            config,
        }
    }

    /// Validate the configuration and prepare the queues for use.
    ///
    /// With `drain_on_start`, responses left over from a previous process are
    /// discarded so they cannot be mistaken for answers to new requests.
    pub async fn connect(
        queues: Arc<dyn ExchangeQueues>,
        config: ClientConfig,
    ) -> BridgeResult<Self> {
        config.validate()?;
        let client = Self::new(queues, config);

        if client.config.drain_on_start {
            let drained = client.drain_stale().await?;
            if drained > 0 {
                tracing::info!(drained, "Discarded stale responses from vendor queue");
            }
        }

        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Discard every response currently waiting on the response queue
    pub async fn drain_stale(&self) -> BridgeResult<usize> {
        let _guard = self.exchange.lock().await;
        let pending = self.queues.pending_responses().await;
        if pending > 0 {
            tracing::debug!(pending, "Vendor response queue is not empty");
        }

        let mut drained = 0;
        while let Some(response) = self.queues.try_dequeue().await? {
            tracing::debug!(
                uid = %response.uid,
                data_type = %response.data_type,
                "Draining stale response"
            );
            drained += 1;
        }
        Ok(drained)
    }

    /// Send one request and wait for its response
    pub async fn request(
        &self,
        uid: &str,
        data_type: CollectDataType,
        data: RequestData,
        timeout: Duration,
    ) -> BridgeResult<ResponseData> {
        self.request_with_cancel(uid, data_type, data, timeout, &CancellationToken::new())
            .await
    }

    /// Send one request and wait for its response, giving up when `cancel` fires.
    ///
    /// Cancellation is observed while waiting for the exchange lock and
    /// between poll iterations. A request that was already enqueued is not
    /// retracted from the vendor SDK.
    pub async fn request_with_cancel(
        &self,
        uid: &str,
        data_type: CollectDataType,
        data: RequestData,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> BridgeResult<ResponseData> {
        if timeout.is_zero() {
            return Err(BridgeError::InvalidArgument(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
            guard = self.exchange.lock() => guard,
        };

        let started = Instant::now();
        tracing::debug!(uid, data_type = %data_type, "Enqueueing request");
        self.queues
            .enqueue(RequestMessage::new(uid, data_type, data))
            .await?;

        let poll_interval = self.config.poll_interval();
        loop {
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                tracing::warn!(
                    uid,
                    data_type = %data_type,
                    timeout_ms = timeout.as_millis() as u64,
                    "No matching response before deadline"
                );
                return Err(BridgeError::Timeout {
                    uid: uid.to_string(),
                    data_type,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            if cancel.is_cancelled() {
                return Err(BridgeError::Cancelled);
            }

            while let Some(response) = self.queues.try_dequeue().await? {
                if response.matches(uid, data_type) {
                    tracing::debug!(
                        uid,
                        data_type = %data_type,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        result = ?response.data.result_code(),
                        "Matched response"
                    );
                    return Ok(response.data);
                }

                tracing::debug!(
                    expected_uid = uid,
                    expected_type = %data_type,
                    uid = %response.uid,
                    data_type = %response.data_type,
                    shape = response.data.kind_name(),
                    "Discarding non-matching response"
                );
            }

            let wait = poll_interval.min(timeout - elapsed);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    // =========================================================================
    // Machine management
    // =========================================================================

    /// Machines currently registered in the vendor SDK, with the vendor's
    /// result code so a refusal is not mistaken for an empty fleet
    pub async fn list_machines(&self) -> BridgeResult<MachineListOutcome> {
        let kind = CollectDataType::GetMachineList;
        let data = self
            .request("", kind, RequestData::None, self.config.command_timeout())
            .await?;

        let result_code = data.result_code();
        let success = reply_succeeded(kind, result_code);
        if !success {
            tracing::warn!(result = ?result_code, "Machine list refused by vendor");
        }

        let machines = match data {
            _ if !success => Vec::new(),
            ResponseData::MachineList(list) => list.machine_ip_info,
            ResponseData::Other(value) => serde_json::from_value::<MachineInfoList>(value)
                .map(|list| list.machine_ip_info)
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        Ok(MachineListOutcome {
            success,
            result_code,
            machines,
        })
    }

    pub async fn add_machine(
        &self,
        uid: &str,
        ip: &str,
        port: u16,
    ) -> BridgeResult<CommandOutcome> {
        self.command(
            uid,
            CollectDataType::AddMachine,
            RequestData::MachineIp(machine_ip(uid, ip, port)),
        )
        .await
    }

    /// Replace the address of a registered machine
    pub async fn update_machine(
        &self,
        uid: &str,
        ip: &str,
        port: u16,
    ) -> BridgeResult<CommandOutcome> {
        self.command(
            uid,
            CollectDataType::UpdateMachine,
            RequestData::MachineIp(machine_ip(uid, ip, port)),
        )
        .await
    }

    pub async fn delete_machine(&self, uid: &str) -> BridgeResult<CommandOutcome> {
        self.command(uid, CollectDataType::DeleteMachine, RequestData::None)
            .await
    }

    /// Press the reset button. An empty reply counts as success.
    pub async fn reset_machine(&self, uid: &str) -> BridgeResult<CommandOutcome> {
        self.command(uid, CollectDataType::ResetButton, RequestData::None)
            .await
    }

    /// Raw GetMachineStatus reply
    pub async fn machine_status(&self, uid: &str) -> BridgeResult<ResponseData> {
        self.request(
            uid,
            CollectDataType::GetMachineStatus,
            RequestData::None,
            self.config.default_timeout(),
        )
        .await
    }

    async fn command(
        &self,
        uid: &str,
        data_type: CollectDataType,
        data: RequestData,
    ) -> BridgeResult<CommandOutcome> {
        let reply = self
            .request(uid, data_type, data, self.config.command_timeout())
            .await?;
        let outcome = CommandOutcome::from_response(data_type, &reply);
        if !outcome.success {
            tracing::info!(
                uid,
                data_type = %data_type,
                result = ?outcome.result_code,
                "Command refused by vendor"
            );
        }
        Ok(outcome)
    }
}

fn machine_ip(uid: &str, ip: &str, port: u16) -> MachineIpInfo {
    MachineIpInfo {
        uid: uid.to_string(),
        ip_address: ip.to_string(),
        port,
    }
}
