//! NC program models

use serde::{Deserialize, Serialize};

/// One entry of a controller's program directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEntry {
    pub no: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub opened: bool,
}

/// GetProgListInfo response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramListInfo {
    pub result: i16,
    pub head_type: i16,
    #[serde(default)]
    pub program_array: Vec<ProgramEntry>,
}

/// GetActivateProgInfo response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProgramInfo {
    pub result: i16,
    #[serde(default)]
    pub main_program_name: String,
    #[serde(default)]
    pub main_program_comment: String,
    #[serde(default)]
    pub sub_program_name: String,
    #[serde(default)]
    pub sub_program_comment: String,
}

/// GetProgDataInfo request payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDataRequest {
    #[serde(default)]
    pub head_type: i16,
    pub program_no: i32,
}

/// GetProgDataInfo response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDataInfo {
    pub result: i16,
    pub head_type: i16,
    pub program_no: i32,
    #[serde(default)]
    pub program_data: String,
}

/// UpdateProgram request payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramUpdate {
    #[serde(default)]
    pub head_type: i16,
    pub program_no: i32,
    #[serde(default)]
    pub program_data: String,
    #[serde(default)]
    pub is_new: bool,
}
