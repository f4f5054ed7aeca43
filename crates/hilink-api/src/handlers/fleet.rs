//! Fleet-wide handlers

use axum::extract::State;
use axum::Json;
use hilink_core::CollectDataType;
use serde::Serialize;

use crate::error::ApiError;
use crate::projection::{failure_message, SweepResult};
use crate::state::AppState;

/// Response for the emergency-stop sweep
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyStopResponse {
    /// True when the fleet could be listed and every machine accepted the reset
    pub success: bool,
    /// Vendor code of a refused machine listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub results: Vec<SweepResult>,
}

/// Response for resume-all
#[derive(Debug, Serialize)]
pub struct ResumeAllResponse {
    pub success: bool,
    pub message: String,
}

/// POST /emergency-stop
/// Press reset on every registered machine, one at a time
pub async fn emergency_stop(
    State(state): State<AppState>,
) -> Result<Json<EmergencyStopResponse>, ApiError> {
    let kind = CollectDataType::ResetButton;
    state.authorize(kind)?;

    let listed = state
        .client()
        .list_machines()
        .await
        .map_err(|e| ApiError::exchange("", CollectDataType::GetMachineList, e))?;

    if !listed.success {
        tracing::error!(
            result = ?listed.result_code,
            "Emergency stop aborted: machine list refused by vendor"
        );
        return Ok(Json(EmergencyStopResponse {
            success: false,
            result_code: listed.result_code,
            message: Some(failure_message(
                "",
                CollectDataType::GetMachineList,
                listed.result_code,
            )),
            results: Vec::new(),
        }));
    }

    let machines = listed.machines;
    tracing::warn!(machines = machines.len(), "Emergency stop requested");

    let mut results = Vec::with_capacity(machines.len());
    for machine in machines {
        let uid = machine.uid;
        let result = match state.client().reset_machine(&uid).await {
            Ok(reset) => SweepResult::new(uid, reset),
            Err(e) => {
                tracing::warn!(uid = %uid, error = %e, "Emergency stop reset failed");
                SweepResult {
                    uid,
                    success: false,
                    result_code: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    Ok(Json(EmergencyStopResponse {
        success: results.iter().all(|r| r.success),
        result_code: None,
        message: None,
        results,
    }))
}

/// POST /resume-all
/// Acknowledged without contacting the vendor SDK, which has no resume operation
pub async fn resume_all() -> Json<ResumeAllResponse> {
    Json(ResumeAllResponse {
        success: true,
        message: "resume-all is a no-op for Hi-Link bridge (no specific API).".to_string(),
    })
}
