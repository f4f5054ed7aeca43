//! Application state for the gateway

use std::sync::Arc;

use hilink_core::{AccessPolicy, CollectDataType};
use hilink_mode2::Mode2Client;

use crate::cooldown::{is_throttled_read, Cooldown, RateLimitConfig};
use crate::error::ApiError;

const CONTROL_DISABLED: &str =
    "control API is disabled (set BRIDGE_ALLOW_CONTROL=true to enable)";
const RAW_READ_THROTTLED: &str = "raw read request is temporarily rate-limited.";
const RESET_THROTTLED: &str = "Reset command is temporarily rate-limited.";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    client: Arc<Mode2Client>,
    /// Fixed at startup
    policy: AccessPolicy,
    raw_reads: Arc<Cooldown>,
    resets: Arc<Cooldown>,
}

impl AppState {
    /// State with the default cooldown windows
    pub fn new(client: Arc<Mode2Client>, policy: AccessPolicy) -> Self {
        Self::with_rate_limits(client, policy, &RateLimitConfig::default())
    }

    pub fn with_rate_limits(
        client: Arc<Mode2Client>,
        policy: AccessPolicy,
        limits: &RateLimitConfig,
    ) -> Self {
        Self {
            client,
            policy,
            raw_reads: Arc::new(Cooldown::from_millis(limits.raw_read_cooldown_ms)),
            resets: Arc::new(Cooldown::from_millis(limits.reset_cooldown_ms)),
        }
    }

    pub fn client(&self) -> &Mode2Client {
        &self.client
    }

    /// Reject `kind` unless the policy permits it
    pub fn authorize(&self, kind: CollectDataType) -> Result<(), ApiError> {
        if self.policy.permits(kind) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                message: CONTROL_DISABLED.to_string(),
                data_type: Some(kind),
            })
        }
    }

    /// Reject a repeated `/raw` telemetry read of the same machine and kind
    pub fn throttle_raw_read(&self, uid: &str, kind: CollectDataType) -> Result<(), ApiError> {
        if !is_throttled_read(kind) || self.raw_reads.try_admit(&format!("{uid}:{kind}")) {
            return Ok(());
        }
        tracing::debug!(uid, data_type = %kind, "Raw read rate-limited");
        Err(ApiError::TooManyRequests {
            message: RAW_READ_THROTTLED.to_string(),
            data_type: Some(kind),
        })
    }

    /// Reject a repeated reset of the same machine
    pub fn throttle_reset(&self, uid: &str) -> Result<(), ApiError> {
        if self.resets.try_admit(uid) {
            return Ok(());
        }
        tracing::debug!(uid, "Reset rate-limited");
        Err(ApiError::TooManyRequests {
            message: RESET_THROTTLED.to_string(),
            data_type: Some(CollectDataType::ResetButton),
        })
    }
}
