//! Vendor request-kind codes (Hi-Link `CollectDataType`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operation requested of the vendor SDK.
///
/// The variant names are the vendor's own and are what HTTP callers send in
/// the `dataType` field of `/raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectDataType {
    // Machine registry
    AddMachine,
    UpdateMachine,
    DeleteMachine,
    GetMachineList,
    GetMachineStatus,

    // Production
    GetProductCount,
    GetErrorInfo,
    MachineRunTimeInfo,

    // Programs
    GetActivateProgInfo,
    UpdateActivateProg,
    GetProgListInfo,
    GetProgDataInfo,
    UpdateProgram,
    DeleteProgram,

    // Tools
    GetToolLifeInfo,
    UpdateToolLife,
    GetToolOffsetInfo,
    UpdateToolOffset,

    // Telemetry and operator panel
    GetMotorTemperature,
    GetOPStatus,
    UpdateOPStatus,
    ResetButton,
}

/// Returned when a string does not name a [`CollectDataType`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CollectDataType: {0}")]
pub struct UnknownDataType(pub String);

impl CollectDataType {
    /// Every request kind, in declaration order
    pub const ALL: [CollectDataType; 22] = [
        Self::AddMachine,
        Self::UpdateMachine,
        Self::DeleteMachine,
        Self::GetMachineList,
        Self::GetMachineStatus,
        Self::GetProductCount,
        Self::GetErrorInfo,
        Self::MachineRunTimeInfo,
        Self::GetActivateProgInfo,
        Self::UpdateActivateProg,
        Self::GetProgListInfo,
        Self::GetProgDataInfo,
        Self::UpdateProgram,
        Self::DeleteProgram,
        Self::GetToolLifeInfo,
        Self::UpdateToolLife,
        Self::GetToolOffsetInfo,
        Self::UpdateToolOffset,
        Self::GetMotorTemperature,
        Self::GetOPStatus,
        Self::UpdateOPStatus,
        Self::ResetButton,
    ];

    /// Vendor name of this request kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddMachine => "AddMachine",
            Self::UpdateMachine => "UpdateMachine",
            Self::DeleteMachine => "DeleteMachine",
            Self::GetMachineList => "GetMachineList",
            Self::GetMachineStatus => "GetMachineStatus",
            Self::GetProductCount => "GetProductCount",
            Self::GetErrorInfo => "GetErrorInfo",
            Self::MachineRunTimeInfo => "MachineRunTimeInfo",
            Self::GetActivateProgInfo => "GetActivateProgInfo",
            Self::UpdateActivateProg => "UpdateActivateProg",
            Self::GetProgListInfo => "GetProgListInfo",
            Self::GetProgDataInfo => "GetProgDataInfo",
            Self::UpdateProgram => "UpdateProgram",
            Self::DeleteProgram => "DeleteProgram",
            Self::GetToolLifeInfo => "GetToolLifeInfo",
            Self::UpdateToolLife => "UpdateToolLife",
            Self::GetToolOffsetInfo => "GetToolOffsetInfo",
            Self::UpdateToolOffset => "UpdateToolOffset",
            Self::GetMotorTemperature => "GetMotorTemperature",
            Self::GetOPStatus => "GetOPStatus",
            Self::UpdateOPStatus => "UpdateOPStatus",
            Self::ResetButton => "ResetButton",
        }
    }

    /// Whether this kind only reads telemetry and can never move a machine.
    ///
    /// Read-only kinds are always permitted; every other kind is a control
    /// operation and requires control to be enabled for the process.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::GetOPStatus
                | Self::GetMotorTemperature
                | Self::GetToolLifeInfo
                | Self::GetProgListInfo
                | Self::GetActivateProgInfo
        )
    }

    /// Whether a reply to this kind only counts as success when it carries
    /// result code 0.
    ///
    /// Registry commands must be confirmed explicitly. For every other kind a
    /// reply without a result code is accepted as is.
    pub fn requires_result_code(&self) -> bool {
        matches!(
            self,
            Self::AddMachine | Self::UpdateMachine | Self::DeleteMachine
        )
    }
}

impl fmt::Display for CollectDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectDataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDataType(s.to_string()))
    }
}
