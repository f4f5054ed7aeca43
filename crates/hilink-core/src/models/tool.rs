//! Tool life models

use serde::{Deserialize, Serialize};

/// Tool life counters for one tool pocket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolLifeEntry {
    pub tool_num: i32,
    pub use_count: i32,
    pub config_count: i32,
    pub warning_count: i32,
    #[serde(rename = "use")]
    pub in_use: bool,
}

/// GetToolLifeInfo response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolLifeInfo {
    pub result: i16,
    #[serde(default)]
    pub tool_life: Vec<ToolLifeEntry>,
}
