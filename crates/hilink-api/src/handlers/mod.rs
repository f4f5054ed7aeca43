//! HTTP request handlers for the bridge gateway
//!
//! Every handler authorizes before it reaches the correlation client.

pub mod fleet;
pub mod machines;
pub mod raw;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
