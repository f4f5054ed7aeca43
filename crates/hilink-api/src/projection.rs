//! Projection of vendor response shapes into stable JSON DTOs
//!
//! The vendor SDK answers each request kind with a different record shape.
//! Kinds with an explicit projection below are reduced to the fields HTTP
//! consumers use; everything else is passed through as-is.

use hilink_core::models::{
    ActiveProgramInfo, IoPoint, MachineIpInfo, MachineStatusReport, MotorReading,
    MotorTemperatureInfo, OpStatusInfo, ProgramDataInfo, ProgramEntry, ProgramListInfo,
    ToolLifeEntry, ToolLifeInfo,
};
use hilink_core::{
    describe_failure, describe_missing_code, reply_succeeded, CollectDataType, ResponseData,
    VendorResultCode,
};
use hilink_mode2::{CommandOutcome, MachineListOutcome};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Raw exchange DTOs
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramListDto {
    pub result: i16,
    pub machine_program_list_info: ProgramListBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramListBody {
    pub head_type: i16,
    pub program_array: Vec<ProgramDto>,
}

#[derive(Debug, Serialize)]
pub struct ProgramDto {
    pub no: i32,
    pub comment: String,
    pub opened: bool,
}

impl From<&ProgramEntry> for ProgramDto {
    fn from(p: &ProgramEntry) -> Self {
        Self {
            no: p.no,
            comment: p.comment.clone(),
            opened: p.opened,
        }
    }
}

impl From<&ProgramListInfo> for ProgramListDto {
    fn from(info: &ProgramListInfo) -> Self {
        Self {
            result: info.result,
            machine_program_list_info: ProgramListBody {
                head_type: info.head_type,
                program_array: info.program_array.iter().map(ProgramDto::from).collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProgramDto {
    pub result: i16,
    pub machine_current_prog_info: CurrentProgramDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProgramDto {
    pub main_program_name: String,
    pub main_program_comment: String,
    pub sub_program_name: String,
    pub sub_program_comment: String,
}

impl From<&ActiveProgramInfo> for ActiveProgramDto {
    fn from(info: &ActiveProgramInfo) -> Self {
        Self {
            result: info.result,
            machine_current_prog_info: CurrentProgramDto {
                main_program_name: info.main_program_name.clone(),
                main_program_comment: info.main_program_comment.clone(),
                sub_program_name: info.sub_program_name.clone(),
                sub_program_comment: info.sub_program_comment.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpStatusDto {
    pub result: i16,
    pub io_info: Vec<IoDto>,
}

/// Field names follow the vendor's own casing
#[derive(Debug, Serialize)]
pub struct IoDto {
    #[serde(rename = "IOUID")]
    pub io_uid: i32,
    #[serde(rename = "Status")]
    pub status: i16,
}

impl From<&IoPoint> for IoDto {
    fn from(io: &IoPoint) -> Self {
        Self {
            io_uid: io.io_uid,
            status: io.status,
        }
    }
}

impl From<&OpStatusInfo> for OpStatusDto {
    fn from(info: &OpStatusInfo) -> Self {
        Self {
            result: info.result,
            io_info: info.io_info.iter().map(IoDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolLifeDto {
    pub result: i16,
    pub machine_tool_life: ToolLifeBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolLifeBody {
    pub tool_life: Vec<ToolDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDto {
    pub tool_num: i32,
    pub use_count: i32,
    pub config_count: i32,
    pub warning_count: i32,
    #[serde(rename = "use")]
    pub in_use: bool,
}

impl From<&ToolLifeEntry> for ToolDto {
    fn from(t: &ToolLifeEntry) -> Self {
        Self {
            tool_num: t.tool_num,
            use_count: t.use_count,
            config_count: t.config_count,
            warning_count: t.warning_count,
            in_use: t.in_use,
        }
    }
}

impl From<&ToolLifeInfo> for ToolLifeDto {
    fn from(info: &ToolLifeInfo) -> Self {
        Self {
            result: info.result,
            machine_tool_life: ToolLifeBody {
                tool_life: info.tool_life.iter().map(ToolDto::from).collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorTemperatureDto {
    pub result: i16,
    pub machine_motor_temperature: MotorTemperatureBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorTemperatureBody {
    /// Main, sub and spindle motors, in that order
    pub temp_info: Vec<TemperatureDto>,
}

#[derive(Debug, Serialize)]
pub struct TemperatureDto {
    pub name: String,
    pub temperature: f64,
}

impl From<&MotorReading> for TemperatureDto {
    fn from(m: &MotorReading) -> Self {
        Self {
            name: m.name.clone(),
            temperature: m.temperature,
        }
    }
}

impl From<&MotorTemperatureInfo> for MotorTemperatureDto {
    fn from(info: &MotorTemperatureInfo) -> Self {
        let temp_info = info
            .main_motor_array
            .iter()
            .chain(&info.sub_motor_array)
            .chain(&info.spindle_motor_array)
            .map(TemperatureDto::from)
            .collect();

        Self {
            result: info.result,
            machine_motor_temperature: MotorTemperatureBody { temp_info },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDataDto {
    pub result: i16,
    pub machine_program_data: ProgramDataBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDataBody {
    pub head_type: i16,
    pub program_no: i32,
    pub program_data: String,
}

impl From<&ProgramDataInfo> for ProgramDataDto {
    fn from(info: &ProgramDataInfo) -> Self {
        Self {
            result: info.result,
            machine_program_data: ProgramDataBody {
                head_type: info.head_type,
                program_no: info.program_no,
                program_data: info.program_data.clone(),
            },
        }
    }
}

/// Project a raw reply into its DTO, or pass it through unchanged
pub fn project(kind: CollectDataType, data: &ResponseData) -> Value {
    let projected = match (kind, data) {
        (CollectDataType::GetProgListInfo, ResponseData::ProgramList(v)) => {
            serde_json::to_value(ProgramListDto::from(v))
        }
        (CollectDataType::GetActivateProgInfo, ResponseData::ActiveProgram(v)) => {
            serde_json::to_value(ActiveProgramDto::from(v))
        }
        (CollectDataType::GetOPStatus, ResponseData::OpStatus(v)) => {
            serde_json::to_value(OpStatusDto::from(v))
        }
        (CollectDataType::GetToolLifeInfo, ResponseData::ToolLife(v)) => {
            serde_json::to_value(ToolLifeDto::from(v))
        }
        (CollectDataType::GetMotorTemperature, ResponseData::MotorTemperature(v)) => {
            serde_json::to_value(MotorTemperatureDto::from(v))
        }
        (CollectDataType::GetProgDataInfo, ResponseData::ProgramData(v)) => {
            serde_json::to_value(ProgramDataDto::from(v))
        }
        _ => serde_json::to_value(data),
    };
    // The DTOs and vendor shapes hold only strings, numbers and lists
    projected.unwrap_or(Value::Null)
}

// =============================================================================
// Outcome and messages
// =============================================================================

/// Success flag and diagnostic for a vendor result code.
///
/// Success follows [`reply_succeeded`]: code 0, or no code at all for kinds
/// that do not require one. Failures always carry a message.
pub fn outcome(uid: &str, kind: CollectDataType, result: Option<i32>) -> (bool, Option<String>) {
    if reply_succeeded(kind, result) {
        (true, None)
    } else {
        (false, Some(failure_message(uid, kind, result)))
    }
}

/// Diagnostic for a failed reply.
///
/// A non-zero code takes its message from the result-code dictionary, falling
/// back to a generic diagnostic naming the target, kind and code.
pub fn failure_message(uid: &str, kind: CollectDataType, result: Option<i32>) -> String {
    match result {
        Some(code) => VendorResultCode::from(code)
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| describe_failure(uid, kind, code)),
        None => describe_missing_code(uid, kind),
    }
}

/// `/raw` reply body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub success: bool,
    pub data_type: CollectDataType,
    pub result: Option<i32>,
    pub message: Option<String>,
    pub data: Value,
}

impl RawResponse {
    pub fn new(uid: &str, kind: CollectDataType, data: &ResponseData) -> Self {
        let result = data.result_code();
        let (success, message) = outcome(uid, kind, result);
        Self {
            success,
            data_type: kind,
            result,
            message,
            data: project(kind, data),
        }
    }
}

/// Reply body of the fixed machine-management commands
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn new(uid: &str, kind: CollectDataType, outcome: CommandOutcome) -> Self {
        let message =
            (!outcome.success).then(|| failure_message(uid, kind, outcome.result_code));
        Self {
            success: outcome.success,
            result_code: outcome.result_code,
            message,
        }
    }
}

/// `GET /machines/{uid}/status` reply body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub status: String,
    pub result_code: Option<i32>,
    pub message: Option<String>,
    pub result: Value,
}

impl StatusResponse {
    pub fn new(uid: &str, data: &ResponseData) -> Self {
        let result_code = data.result_code();
        let status = match (data, result_code) {
            (ResponseData::MachineStatus(MachineStatusReport { status, .. }), Some(0)) => {
                status.to_string()
            }
            (_, Some(code)) if code != 0 => "Error".to_string(),
            _ => "Unknown".to_string(),
        };
        // a status reply without a code carries no status either
        let success = result_code == Some(0);
        let message = (!success)
            .then(|| failure_message(uid, CollectDataType::GetMachineStatus, result_code));

        Self {
            success,
            status,
            result_code,
            message,
            result: project(CollectDataType::GetMachineStatus, data),
        }
    }
}

/// `GET /machines` reply body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineListResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub machines: Vec<MachineIpInfo>,
}

impl From<MachineListOutcome> for MachineListResponse {
    fn from(listed: MachineListOutcome) -> Self {
        let message = (!listed.success)
            .then(|| failure_message("", CollectDataType::GetMachineList, listed.result_code));
        Self {
            success: listed.success,
            result_code: listed.result_code,
            message,
            machines: listed.machines,
        }
    }
}

/// One machine's entry in the emergency-stop sweep
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    pub uid: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SweepResult {
    pub fn new(uid: String, outcome: CommandOutcome) -> Self {
        let error = (!outcome.success)
            .then(|| failure_message(&uid, CollectDataType::ResetButton, outcome.result_code));
        Self {
            uid,
            success: outcome.success,
            result_code: outcome.result_code,
            error,
        }
    }
}
