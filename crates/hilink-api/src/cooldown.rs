//! Per-key request cooldowns
//!
//! Polling dashboards tend to hammer the same read, and operators tend to
//! press reset repeatedly. Both go through the single exchange lock, so a
//! burst for one machine delays every other caller. A cooldown admits one
//! request per key per window and rejects the rest with 429.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use hilink_core::CollectDataType;
use parking_lot::Mutex;
use serde::Deserialize;

/// Prune expired keys once the table grows past this size
const PRUNE_THRESHOLD: usize = 1024;

/// Cooldown windows for the gateway
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Minimum interval between `/raw` reads of the same (uid, kind); 0 disables
    pub raw_read_cooldown_ms: u64,
    /// Minimum interval between resets of the same machine; 0 disables
    pub reset_cooldown_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            raw_read_cooldown_ms: 5000,
            reset_cooldown_ms: 5000,
        }
    }
}

impl RateLimitConfig {
    /// No cooldowns at all
    pub fn disabled() -> Self {
        Self {
            raw_read_cooldown_ms: 0,
            reset_cooldown_ms: 0,
        }
    }
}

/// Telemetry kinds subject to the `/raw` read cooldown
pub fn is_throttled_read(kind: CollectDataType) -> bool {
    matches!(
        kind,
        CollectDataType::GetOPStatus
            | CollectDataType::GetProgListInfo
            | CollectDataType::GetActivateProgInfo
            | CollectDataType::GetMotorTemperature
            | CollectDataType::GetToolLifeInfo
            | CollectDataType::GetMachineList
    )
}

/// Admits one request per key per window
#[derive(Debug)]
pub struct Cooldown {
    window: Duration,
    last_admitted: Mutex<HashMap<String, Instant>>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_admitted: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_millis(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms))
    }

    /// Admit `key` unless it was admitted less than one window ago.
    ///
    /// Rejected attempts do not extend the window.
    pub fn try_admit(&self, key: &str) -> bool {
        if self.window.is_zero() {
            return true;
        }

        let now = Instant::now();
        let mut last_admitted = self.last_admitted.lock();
        if let Some(last) = last_admitted.get(key) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }

        if last_admitted.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            last_admitted.retain(|_, last| now.duration_since(*last) < window);
        }
        last_admitted.insert(key.to_string(), now);
        true
    }
}
