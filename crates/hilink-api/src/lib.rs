//! hilink-api - HTTP gateway for the Hi-Link Mode2 bridge
//!
//! Routes typed HTTP requests to the [`Mode2Client`](hilink_mode2::Mode2Client),
//! enforces the read-only vs. control [`AccessPolicy`](hilink_core::AccessPolicy)
//! and projects vendor replies into stable JSON.
//!
//! # Usage
//!
//! ```ignore
//! use hilink_api::{create_router, AppState};
//!
//! let client = Arc::new(Mode2Client::connect(queues, ClientConfig::default()).await?);
//! let state = AppState::new(client, AccessPolicy::new(false));
//! let router = create_router(state);
//! ```

pub mod cooldown;
pub mod error;
pub mod handlers;
pub mod projection;
pub mod state;

pub use cooldown::RateLimitConfig;
pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Generic pass-through
        .route("/raw", post(handlers::raw::raw_request))
        // Machine registry
        .route(
            "/machines",
            get(handlers::machines::list_machines).post(handlers::machines::add_machine),
        )
        .route(
            "/machines/{uid}",
            put(handlers::machines::update_machine).delete(handlers::machines::delete_machine),
        )
        .route(
            "/machines/{uid}/status",
            get(handlers::machines::machine_status),
        )
        .route(
            "/machines/{uid}/reset",
            post(handlers::machines::reset_machine),
        )
        .route(
            "/machines/{uid}/start",
            post(handlers::machines::start_machine),
        )
        .route("/machines/{uid}/stop", post(handlers::machines::stop_machine))
        // Fleet
        .route("/emergency-stop", post(handlers::fleet::emergency_stop))
        .route("/resume-all", post(handlers::fleet::resume_all))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
