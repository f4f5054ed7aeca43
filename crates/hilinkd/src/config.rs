//! Daemon configuration
//!
//! Loaded once at startup from an optional TOML file, then adjusted by
//! environment variables. Nothing here changes after the server starts.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5005
//!
//! [control]
//! allow_control = false
//!
//! [client]
//! poll_interval_ms = 10
//! default_timeout_ms = 3000
//!
//! [rate_limit]
//! raw_read_cooldown_ms = 5000
//! reset_cooldown_ms = 5000
//!
//! [transport]
//! type = "mock"
//! latency_ms = 20
//!
//! [[transport.machines]]
//! uid = "MC-01"
//! ip = "192.168.0.21"
//! ```

use anyhow::Context;
use hilink_api::RateLimitConfig;
use hilink_core::models::MachineStatusType;
use hilink_mode2::{ClientConfig, MockConfig, MockMachineConfig, TransportConfig};
use serde::Deserialize;

/// Vendor activation serial number
pub const ENV_SERIAL: &str = "HILINK_SERIAL";
/// Set to `true` to enable control-class request kinds
pub const ENV_ALLOW_CONTROL: &str = "BRIDGE_ALLOW_CONTROL";
/// Listening port override
pub const ENV_PORT: &str = "BRIDGE_PORT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub control: ControlConfig,
    pub client: ClientConfig,
    pub rate_limit: RateLimitConfig,
    pub transport: TransportConfig,
    pub activation: ActivationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5005,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Permit request kinds that can change machine state
    pub allow_control: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    pub serial_number: Option<String>,
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file '{}'", path))
    }

    /// Configuration used when no file is given: a small simulated fleet
    pub fn demo() -> Self {
        let machine = |uid: &str, ip: &str, status| MockMachineConfig {
            uid: uid.to_string(),
            ip: ip.to_string(),
            port: 8193,
            status,
            programs: Vec::new(),
        };

        Self {
            transport: TransportConfig::Mock(MockConfig {
                latency_ms: 20,
                require_activation: false,
                machines: vec![
                    machine("MC-01", "192.168.0.21", MachineStatusType::Run),
                    machine("MC-02", "192.168.0.22", MachineStatusType::Ready),
                    machine("MC-03", "192.168.0.23", MachineStatusType::Alarm),
                ],
            }),
            ..Default::default()
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(serial) = lookup(ENV_SERIAL).filter(|s| !s.trim().is_empty()) {
            self.activation.serial_number = Some(serial.trim().to_string());
        }

        if let Some(flag) = lookup(ENV_ALLOW_CONTROL) {
            self.control.allow_control = flag.trim().eq_ignore_ascii_case("true");
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: '{}'", ENV_PORT, port))?;
        }

        Ok(())
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.activation.serial_number.as_deref()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5005");
        assert!(!config.control.allow_control);
        assert_eq!(config.client.default_timeout_ms, 3000);
        assert_eq!(config.rate_limit.raw_read_cooldown_ms, 5000);
        assert_eq!(config.rate_limit.reset_cooldown_ms, 5000);
        assert!(config.serial_number().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
port = 6006

[control]
allow_control = true

[client]
poll_interval_ms = 20

[rate_limit]
reset_cooldown_ms = 0

[transport]
type = "mock"
latency_ms = 5

[[transport.machines]]
uid = "MC-01"
ip = "10.1.1.1"
status = "Alarm"
"#
        )
        .unwrap();

        let config = BridgeConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 6006);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.control.allow_control);
        assert_eq!(config.client.poll_interval_ms, 20);
        assert_eq!(config.client.command_timeout_ms, 5000);
        assert_eq!(config.rate_limit.raw_read_cooldown_ms, 5000);
        assert_eq!(config.rate_limit.reset_cooldown_ms, 0);

        let TransportConfig::Mock(mock) = &config.transport;
        assert_eq!(mock.latency_ms, 5);
        assert_eq!(mock.machines.len(), 1);
        assert_eq!(mock.machines[0].port, 8193);
        assert_eq!(mock.machines[0].status, MachineStatusType::Alarm);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nport = ").unwrap();
        assert!(BridgeConfig::load(file.path().to_str().unwrap()).is_err());
        assert!(BridgeConfig::load("/nonexistent/hilinkd.toml").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BridgeConfig::default();
        config
            .apply_overrides(env(&[
                (ENV_SERIAL, " ABCD-1234 "),
                (ENV_ALLOW_CONTROL, "TRUE"),
                (ENV_PORT, "7007"),
            ]))
            .unwrap();

        assert_eq!(config.serial_number(), Some("ABCD-1234"));
        assert!(config.control.allow_control);
        assert_eq!(config.server.port, 7007);
    }

    #[test]
    fn test_allow_control_only_for_true() {
        let mut config = BridgeConfig::default();
        config.control.allow_control = true;
        config
            .apply_overrides(env(&[(ENV_ALLOW_CONTROL, "yes")]))
            .unwrap();
        assert!(!config.control.allow_control);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = BridgeConfig::default();
        let result = config.apply_overrides(env(&[(ENV_PORT, "not-a-port")]));
        assert!(result.is_err());
    }
}
