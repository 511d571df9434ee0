//! Pre-checkout form route handlers.
//!
//! Server-rendered three-field capture form. A submit drives the form
//! state machine through the full sequence (session fetch, capture,
//! session attach) and redirects to the checkout on success; otherwise the
//! form is re-rendered with inline hints or the surfaced error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::services::form::{FormState, SubmitResult};
use crate::state::AppState;

/// Capture form page template.
#[derive(Template, WebTemplate)]
#[template(path = "precheckout/form.html")]
pub struct PrecheckoutTemplate {
    pub form: FormState,
}

/// Render the empty capture form.
///
/// GET /precheckout
pub async fn page() -> PrecheckoutTemplate {
    PrecheckoutTemplate {
        form: FormState::default(),
    }
}

/// Submitted form fields.
#[derive(Debug, Deserialize)]
pub struct PrecheckoutForm {
    pub email: String,
    pub phone: String,
}

/// Submit the capture form.
///
/// POST /precheckout
#[instrument(skip(state, input), fields(email = %input.email))]
pub async fn submit(
    State(state): State<AppState>,
    Form(input): Form<PrecheckoutForm>,
) -> Response {
    let mut form = FormState::default();
    form.input_email(&input.email);
    form.input_phone(&input.phone);

    match form.submit(state.checkout(), state.masterdata()).await {
        SubmitResult::Redirect(destination) => Redirect::to(destination).into_response(),
        SubmitResult::Stayed => PrecheckoutTemplate { form }.into_response(),
    }
}
