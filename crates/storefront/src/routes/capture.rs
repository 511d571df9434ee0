//! Capture endpoint route handler.
//!
//! Receives the capture payload, re-validates required fields server-side
//! (never trust the client) and runs the idempotent upsert. The success
//! response is committed here; the tower layers wrapping the router
//! (trace, Sentry) run afterwards and do not alter it.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use precheckout_core::CaptureAction;

use crate::error::Result;
use crate::services::capture::{self, CaptureRequest};
use crate::state::AppState;

/// Capture request body.
///
/// `phone` is accepted as a backward-compat alias for `homePhone`; older
/// client builds sent the short name. Fields are optional at the serde
/// level so that missing values produce the structured 400 envelope rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePayload {
    pub email: Option<String>,
    #[serde(alias = "phone")]
    pub home_phone: Option<String>,
    pub order_form_id: Option<String>,
}

/// Capture success response.
#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub ok: bool,
    pub action: CaptureAction,
    pub id: String,
}

/// Upsert a customer record from a capture payload.
///
/// POST /_v/precheckout/client
#[instrument(skip(state, payload), fields(email = payload.email.as_deref().unwrap_or_default()))]
pub async fn save_client(
    State(state): State<AppState>,
    Json(payload): Json<CapturePayload>,
) -> Result<Json<CaptureResponse>> {
    let request = CaptureRequest {
        email: payload.email.unwrap_or_default(),
        home_phone: payload.home_phone.unwrap_or_default(),
        order_form_id: payload.order_form_id,
    };

    let outcome = capture::upsert_customer(state.masterdata(), &request).await?;

    tracing::info!(
        action = ?outcome.action,
        id = %outcome.id,
        "Customer capture stored"
    );

    Ok(Json(CaptureResponse {
        ok: true,
        action: outcome.action,
        id: outcome.id,
    }))
}
