//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hilink_core::{BridgeError, CollectDataType};
use serde::Serialize;
use thiserror::Error;

/// API error type that converts to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("{0}")]
    BadRequest(String),
    /// 400 Bad Request - `dataType` does not name a request kind
    #[error("invalid CollectDataType: {0}")]
    InvalidDataType(String),
    /// 403 Forbidden - control-class request while control is disabled
    #[error("{message}")]
    Forbidden {
        message: String,
        data_type: Option<CollectDataType>,
    },
    /// 404 Not Found
    #[error("{0}")]
    NotFound(String),
    /// 429 Too Many Requests - a cooldown for this target is still running
    #[error("{message}")]
    TooManyRequests {
        message: String,
        data_type: Option<CollectDataType>,
    },
    /// 501 Not Implemented
    #[error("{0}")]
    NotImplemented(String),
    /// 500 - the exchange with the vendor SDK failed (timeout, transport fault)
    #[error("Hi-Link request failed (uid={uid}, type={data_type}, error={source})")]
    Exchange {
        uid: String,
        data_type: CollectDataType,
        #[source]
        source: BridgeError,
    },
}

impl ApiError {
    /// Attach request context to a correlation client failure
    pub fn exchange(uid: &str, data_type: CollectDataType, source: BridgeError) -> Self {
        Self::Exchange {
            uid: uid.to_string(),
            data_type,
            source,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidDataType(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Exchange {
                source: BridgeError::InvalidArgument(_),
                ..
            } => StatusCode::BAD_REQUEST,
            Self::Exchange { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidDataType(_) => "invalid_data_type",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::TooManyRequests { .. } => "too_many_requests",
            Self::NotImplemented(_) => "not_implemented",
            Self::Exchange { source, .. } if source.is_timeout() => "timeout",
            Self::Exchange { .. } => "exchange_failed",
        }
    }
}

/// Uniform failure body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_type: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();
        let message = self.to_string();

        let data_type = match &self {
            Self::InvalidDataType(raw) => Some(raw.clone()),
            Self::Forbidden { data_type, .. } | Self::TooManyRequests { data_type, .. } => {
                data_type.map(|k| k.to_string())
            }
            Self::Exchange { data_type, .. } => Some(data_type.to_string()),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
            data_type,
        });

        (status, body).into_response()
    }
}
