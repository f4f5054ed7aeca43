//! Messages carried by the vendor exchange queues
//!
//! The vendor SDK correlates nothing: a response only carries the machine
//! UID and the request kind it answers. [`ResponseMessage::matches`] is the
//! whole correlation key.

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    ActiveProgramInfo, MachineInfoList, MachineIpInfo, MachineStatusReport, MotorTemperatureInfo,
    OpStatusInfo, ProductCountInfo, ProgramDataInfo, ProgramDataRequest, ProgramListInfo,
    ProgramUpdate, ToolLifeEntry, ToolLifeInfo,
};
use crate::CollectDataType;

/// Payload of a request pushed onto the vendor request queue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestData {
    None,
    /// Head selector for program/tool-offset listings (0 = main, 1 = sub)
    HeadType(i16),
    MachineIp(MachineIpInfo),
    ProgramData(ProgramDataRequest),
    ProgramUpdate(ProgramUpdate),
    ToolLife(Vec<ToolLifeEntry>),
    Json(Value),
}

/// A request as the vendor SDK sees it
#[derive(Debug, Clone)]
pub struct RequestMessage {
    /// Target machine UID, empty for fleet-wide kinds
    pub uid: String,
    pub data_type: CollectDataType,
    pub data: RequestData,
}

impl RequestMessage {
    pub fn new(uid: impl Into<String>, data_type: CollectDataType, data: RequestData) -> Self {
        Self {
            uid: uid.into(),
            data_type,
            data,
        }
    }
}

/// Payload of a vendor response.
///
/// The shape depends on the request kind. Serialization is untagged so a
/// response without an explicit projection can be passed through as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Empty,
    /// Bare result code (delete, reset, update-style kinds)
    Code(i16),
    MachineList(MachineInfoList),
    MachineStatus(MachineStatusReport),
    ProgramList(ProgramListInfo),
    ActiveProgram(ActiveProgramInfo),
    ProgramData(ProgramDataInfo),
    OpStatus(OpStatusInfo),
    ToolLife(ToolLifeInfo),
    MotorTemperature(MotorTemperatureInfo),
    ProductCount(ProductCountInfo),
    Other(Value),
}

impl ResponseData {
    /// Vendor result code embedded in this payload, if the shape has one
    pub fn result_code(&self) -> Option<i32> {
        let code = match self {
            Self::Empty => return None,
            Self::Code(code) => *code,
            Self::MachineList(v) => v.result,
            Self::MachineStatus(v) => v.result,
            Self::ProgramList(v) => v.result,
            Self::ActiveProgram(v) => v.result,
            Self::ProgramData(v) => v.result,
            Self::OpStatus(v) => v.result,
            Self::ToolLife(v) => v.result,
            Self::MotorTemperature(v) => v.result,
            Self::ProductCount(v) => v.result,
            Self::Other(value) => {
                return value
                    .get("result")
                    .and_then(Value::as_i64)
                    .and_then(|c| i32::try_from(c).ok())
            }
        };
        Some(i32::from(code))
    }

    /// Short shape name for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Code(_) => "code",
            Self::MachineList(_) => "machine_list",
            Self::MachineStatus(_) => "machine_status",
            Self::ProgramList(_) => "program_list",
            Self::ActiveProgram(_) => "active_program",
            Self::ProgramData(_) => "program_data",
            Self::OpStatus(_) => "op_status",
            Self::ToolLife(_) => "tool_life",
            Self::MotorTemperature(_) => "motor_temperature",
            Self::ProductCount(_) => "product_count",
            Self::Other(_) => "other",
        }
    }
}

/// A response popped from the vendor response queue
#[derive(Debug, Clone)]
pub struct ResponseMessage {
    pub uid: String,
    pub data_type: CollectDataType,
    pub data: ResponseData,
}

impl ResponseMessage {
    pub fn new(uid: impl Into<String>, data_type: CollectDataType, data: ResponseData) -> Self {
        Self {
            uid: uid.into(),
            data_type,
            data,
        }
    }

    /// Correlation predicate: same target UID and same request kind
    pub fn matches(&self, uid: &str, data_type: CollectDataType) -> bool {
        self.uid == uid && self.data_type == data_type
    }
}
