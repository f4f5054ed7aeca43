//! Telemetry and operator panel models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorReading {
    pub name: String,
    pub temperature: f64,
}

/// GetMotorTemperature response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorTemperatureInfo {
    pub result: i16,
    #[serde(default)]
    pub main_motor_array: Vec<MotorReading>,
    #[serde(default)]
    pub sub_motor_array: Vec<MotorReading>,
    #[serde(default)]
    pub spindle_motor_array: Vec<MotorReading>,
}

/// State of one operator-panel I/O point (1 = on)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoPoint {
    pub io_uid: i32,
    pub status: i16,
}

/// GetOPStatus response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpStatusInfo {
    pub result: i16,
    #[serde(default)]
    pub io_info: Vec<IoPoint>,
}

/// GetProductCount response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCountInfo {
    pub result: i16,
    pub current_count: i64,
    pub target_count: i64,
}
