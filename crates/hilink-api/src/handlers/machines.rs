//! Machine registry handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use hilink_core::CollectDataType;
use serde::Deserialize;

use crate::error::ApiError;
use crate::projection::{CommandResponse, MachineListResponse, StatusResponse};
use crate::state::AppState;

const START_NOT_IMPLEMENTED: &str = "Start command is not implemented in Hi-Link bridge. \
     Use /raw with appropriate CollectDataType.";
const STOP_NOT_IMPLEMENTED: &str = "Stop command is not implemented in Hi-Link bridge. \
     Use /raw with appropriate CollectDataType.";

/// Request to register a machine
#[derive(Debug, Deserialize)]
pub struct AddMachineRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub ip: String,
    pub port: u16,
}

/// Request to change a machine's address
#[derive(Debug, Deserialize)]
pub struct UpdateMachineRequest {
    #[serde(default)]
    pub ip: String,
    pub port: u16,
}

/// GET /machines
pub async fn list_machines(
    State(state): State<AppState>,
) -> Result<Json<MachineListResponse>, ApiError> {
    let listed = state
        .client()
        .list_machines()
        .await
        .map_err(|e| ApiError::exchange("", CollectDataType::GetMachineList, e))?;

    Ok(Json(MachineListResponse::from(listed)))
}

/// POST /machines
pub async fn add_machine(
    State(state): State<AppState>,
    body: Result<Json<AddMachineRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let kind = CollectDataType::AddMachine;
    state.authorize(kind)?;

    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let uid = request.uid.trim();
    let ip = request.ip.trim();
    if uid.is_empty() || ip.is_empty() {
        return Err(ApiError::BadRequest("uid, ip are required".to_string()));
    }

    let outcome = state
        .client()
        .add_machine(uid, ip, request.port)
        .await
        .map_err(|e| ApiError::exchange(uid, kind, e))?;

    tracing::info!(
        uid,
        ip,
        port = request.port,
        success = outcome.success,
        "Machine registration"
    );
    Ok(Json(CommandResponse::new(uid, kind, outcome)))
}

/// PUT /machines/{uid}
pub async fn update_machine(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Result<Json<UpdateMachineRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let kind = CollectDataType::UpdateMachine;
    state.authorize(kind)?;

    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let ip = request.ip.trim();
    if ip.is_empty() {
        return Err(ApiError::BadRequest("ip is required".to_string()));
    }

    let outcome = state
        .client()
        .update_machine(&uid, ip, request.port)
        .await
        .map_err(|e| ApiError::exchange(&uid, kind, e))?;

    Ok(Json(CommandResponse::new(&uid, kind, outcome)))
}

/// DELETE /machines/{uid}
pub async fn delete_machine(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let kind = CollectDataType::DeleteMachine;
    state.authorize(kind)?;

    let outcome = state
        .client()
        .delete_machine(&uid)
        .await
        .map_err(|e| ApiError::exchange(&uid, kind, e))?;

    tracing::info!(uid = %uid, success = outcome.success, "Machine removal");
    Ok(Json(CommandResponse::new(&uid, kind, outcome)))
}

/// GET /machines/{uid}/status
pub async fn machine_status(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let reply = state
        .client()
        .machine_status(&uid)
        .await
        .map_err(|e| ApiError::exchange(&uid, CollectDataType::GetMachineStatus, e))?;

    let response = StatusResponse::new(&uid, &reply);
    tracing::debug!(
        uid = %uid,
        status = %response.status,
        result = ?response.result_code,
        "Machine status"
    );
    Ok(Json(response))
}

/// POST /machines/{uid}/reset
pub async fn reset_machine(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let kind = CollectDataType::ResetButton;
    state.authorize(kind)?;
    state.throttle_reset(&uid)?;

    let outcome = state
        .client()
        .reset_machine(&uid)
        .await
        .map_err(|e| ApiError::exchange(&uid, kind, e))?;

    Ok(Json(CommandResponse::new(&uid, kind, outcome)))
}

/// POST /machines/{uid}/start
pub async fn start_machine(Path(uid): Path<String>) -> ApiError {
    tracing::debug!(uid = %uid, "Start requested");
    ApiError::NotImplemented(START_NOT_IMPLEMENTED.to_string())
}

/// POST /machines/{uid}/stop
pub async fn stop_machine(Path(uid): Path<String>) -> ApiError {
    tracing::debug!(uid = %uid, "Stop requested");
    ApiError::NotImplemented(STOP_NOT_IMPLEMENTED.to_string())
}
