//! Correlation client and transport configuration

use std::collections::HashSet;
use std::time::Duration;

use hilink_core::models::{MachineStatusType, ProgramEntry};
use serde::{Deserialize, Serialize};

use crate::TransportError;

/// Correlation client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Interval between response-queue polls
    pub poll_interval_ms: u64,
    /// Timeout for `/raw` requests that do not specify one
    pub default_timeout_ms: u64,
    /// Timeout for the fixed machine-management commands
    pub command_timeout_ms: u64,
    /// Discard responses left in the vendor queue when the client starts
    pub drain_on_start: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            default_timeout_ms: 3000,
            command_timeout_ms: 5000,
            drain_on_start: true,
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), TransportError> {
        if self.poll_interval_ms == 0 {
            return Err(TransportError::InvalidConfig(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.default_timeout_ms == 0 || self.command_timeout_ms == 0 {
            return Err(TransportError::InvalidConfig(
                "timeouts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Transport Configuration
// =============================================================================

/// Which implementation backs the exchange queues
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// In-process simulated vendor SDK
    Mock(MockConfig),
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Mock(MockConfig::default())
    }
}

/// Simulated vendor SDK configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    /// Delay before a response appears on the response queue
    #[serde(default)]
    pub latency_ms: u64,
    /// Answer every request with -99 unless an activation serial is set
    #[serde(default)]
    pub require_activation: bool,
    /// Machines registered at startup
    #[serde(default)]
    pub machines: Vec<MockMachineConfig>,
}

impl MockConfig {
    pub fn validate(&self) -> Result<(), TransportError> {
        let mut seen = HashSet::new();
        for machine in &self.machines {
            if machine.uid.trim().is_empty() {
                return Err(TransportError::InvalidConfig(
                    "mock machine uid must not be empty".to_string(),
                ));
            }
            if !seen.insert(machine.uid.as_str()) {
                return Err(TransportError::InvalidConfig(format!(
                    "duplicate mock machine uid: {}",
                    machine.uid
                )));
            }
        }
        Ok(())
    }
}

/// A machine pre-registered in the simulated vendor SDK
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockMachineConfig {
    pub uid: String,
    pub ip: String,
    #[serde(default = "default_cnc_port")]
    pub port: u16,
    #[serde(default = "default_status")]
    pub status: MachineStatusType,
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
}

fn default_cnc_port() -> u16 {
    8193
}

fn default_status() -> MachineStatusType {
    MachineStatusType::Ready
}
