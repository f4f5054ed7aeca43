//! Generic pass-through to the vendor SDK

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use hilink_core::models::{MachineIpInfo, ProgramDataRequest, ProgramUpdate, ToolLifeEntry};
use hilink_core::{CollectDataType, RequestData};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::projection::RawResponse;
use crate::state::AppState;

/// Body of `POST /raw`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRequest {
    pub uid: Option<String>,
    pub data_type: Option<String>,
    pub payload: Value,
    pub timeout_milliseconds: i64,
}

/// POST /raw
/// Send any request kind by its vendor name
pub async fn raw_request(
    State(state): State<AppState>,
    body: Result<Json<RawRequest>, JsonRejection>,
) -> Result<Json<RawResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let name = request
        .data_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("dataType is required".to_string()))?;

    let kind: CollectDataType = name
        .parse()
        .map_err(|_| ApiError::InvalidDataType(name.to_string()))?;

    state.authorize(kind)?;

    let uid = request.uid.unwrap_or_default();
    state.throttle_raw_read(&uid, kind)?;

    let data = coerce_payload(kind, request.payload)?;
    let timeout = resolve_timeout(
        request.timeout_milliseconds,
        state.client().config().default_timeout(),
    );

    tracing::info!(
        uid = %uid,
        data_type = %kind,
        timeout_ms = timeout.as_millis() as u64,
        "Raw request"
    );

    let reply = state
        .client()
        .request(&uid, kind, data, timeout)
        .await
        .map_err(|e| ApiError::exchange(&uid, kind, e))?;

    let response = RawResponse::new(&uid, kind, &reply);
    tracing::debug!(
        uid = %uid,
        data_type = %kind,
        result = ?response.result,
        shape = reply.kind_name(),
        "Raw response"
    );
    Ok(Json(response))
}

/// Non-positive timeouts fall back to the configured default
fn resolve_timeout(requested_ms: i64, default: Duration) -> Duration {
    u64::try_from(requested_ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(default)
}

/// Convert the untyped JSON payload into the shape the vendor SDK expects
fn coerce_payload(kind: CollectDataType, payload: Value) -> Result<RequestData, ApiError> {
    if payload.is_null() {
        return Ok(RequestData::None);
    }

    match kind {
        CollectDataType::GetProgListInfo | CollectDataType::GetToolOffsetInfo => {
            Ok(RequestData::HeadType(head_type(&payload)))
        }
        CollectDataType::GetProgDataInfo => {
            let request: ProgramDataRequest = parse_nested(kind, payload, "machineProgramData")?;
            if request.program_no <= 0 {
                return Err(ApiError::BadRequest(format!(
                    "invalid programNo for {} (must be > 0): {}",
                    kind, request.program_no
                )));
            }
            Ok(RequestData::ProgramData(request))
        }
        CollectDataType::UpdateProgram => {
            let update: ProgramUpdate = parse_nested(kind, payload, "machineProgramData")?;
            if update.program_no <= 0 {
                return Err(ApiError::BadRequest(format!(
                    "invalid programNo for {} (must be > 0): {}",
                    kind, update.program_no
                )));
            }
            Ok(RequestData::ProgramUpdate(update))
        }
        CollectDataType::UpdateToolLife => {
            let tools: Vec<ToolLifeEntry> = parse(kind, payload)?;
            if tools.is_empty() {
                return Err(ApiError::BadRequest(format!(
                    "invalid payload for {} (expected a non-empty tool life list)",
                    kind
                )));
            }
            Ok(RequestData::ToolLife(tools))
        }
        CollectDataType::AddMachine | CollectDataType::UpdateMachine => {
            let info: MachineIpInfo = parse(kind, payload)?;
            Ok(RequestData::MachineIp(info))
        }
        _ => Ok(RequestData::Json(payload)),
    }
}

/// Head selector from a number or numeric string; anything else selects the main head
fn head_type(payload: &Value) -> i16 {
    let parsed = match payload {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.and_then(|v| i16::try_from(v).ok()).unwrap_or(0)
}

fn parse<T: DeserializeOwned>(kind: CollectDataType, payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::BadRequest(format!("failed to parse payload for {}: {}", kind, e)))
}

/// Accept the record either bare or wrapped in its vendor envelope field
fn parse_nested<T: DeserializeOwned>(
    kind: CollectDataType,
    mut payload: Value,
    envelope: &str,
) -> Result<T, ApiError> {
    if let Some(inner) = payload.get_mut(envelope) {
        let inner = inner.take();
        return parse(kind, inner);
    }
    parse(kind, payload)
}
