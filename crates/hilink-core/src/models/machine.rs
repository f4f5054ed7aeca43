//! Machine registry models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network address of a registered machine.
///
/// Created by AddMachine, replaced by UpdateMachine, removed by
/// DeleteMachine. The vendor SDK owns the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineIpInfo {
    #[serde(alias = "UID")]
    pub uid: String,
    #[serde(alias = "ip", alias = "IpAddress")]
    pub ip_address: String,
    #[serde(alias = "Port")]
    pub port: u16,
}

/// GetMachineList response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineInfoList {
    pub result: i16,
    #[serde(default)]
    pub machine_ip_info: Vec<MachineIpInfo>,
}

/// Operating state reported by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineStatusType {
    #[default]
    None,
    Ready,
    Run,
    Stop,
    Alarm,
    Emergency,
    Offline,
}

impl fmt::Display for MachineStatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Ready => "Ready",
            Self::Run => "Run",
            Self::Stop => "Stop",
            Self::Alarm => "Alarm",
            Self::Emergency => "Emergency",
            Self::Offline => "Offline",
        };
        f.write_str(name)
    }
}

/// GetMachineStatus / AddMachine / UpdateMachine response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatusReport {
    pub result: i16,
    #[serde(default)]
    pub status: MachineStatusType,
}
