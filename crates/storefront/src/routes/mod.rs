//! HTTP route handlers for the capture service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Pre-checkout form
//! GET  /precheckout            - Capture form page
//! POST /precheckout            - Submit the form (redirects to checkout)
//!
//! # Capture endpoint
//! POST /_v/precheckout/client  - Idempotent customer upsert (JSON)
//! ```

pub mod capture;
pub mod precheckout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the capture service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/precheckout",
            get(precheckout::page).post(precheckout::submit),
        )
        .route("/_v/precheckout/client", post(capture::save_client))
}
