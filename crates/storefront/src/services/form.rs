//! Pre-checkout form state machine.
//!
//! Holds the transient three-field form state, recomputes validity on every
//! keystroke through the core validators, and orchestrates the submit
//! sequence: fetch the order session, submit the capture, attach the
//! identity to the session. Each step's failure aborts the sequence and
//! surfaces the most specific message available.
//!
//! The state is an explicit struct threaded through the component; nothing
//! here is process-wide.

use precheckout_core::{Email, Phone, phone};

use crate::services::capture::{CaptureApi, CaptureRequest};
use crate::vtex::checkout::CheckoutError;

/// Fixed checkout destination navigated to after a successful submit.
pub const CHECKOUT_URL: &str = "/checkout/#/cart";

/// Fallback when the session attach fails without a usable message.
const ATTACH_FALLBACK: &str = "could not prepare the checkout";
/// Fallback when the session fetch itself fails.
const GENERIC_FALLBACK: &str = "unexpected error";

/// The order session collaborator, as seen by the form controller.
///
/// Production impl is `CheckoutClient`; tests use fakes.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    /// Fetch the current order session id, if one exists.
    async fn current_order_form(&self) -> Result<Option<String>, CheckoutError>;

    /// Attach the captured identity to a session.
    async fn attach_profile(
        &self,
        order_form_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<(), CheckoutError>;
}

/// Where the form ended up after a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Still on the form: invalid input, in-flight guard, or an error
    /// (check [`FormState::error`]).
    Stayed,
    /// Submit succeeded; navigate to the fixed checkout destination.
    Redirect(&'static str),
}

/// Transient client-side form state. Destroyed on navigation away.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Raw email input.
    pub email: String,
    /// Masked phone input, `(DD) XXXXX-XXXX`.
    pub phone_display: String,
    /// Whether the email field has been blurred or a submit attempted.
    pub email_touched: bool,
    /// Whether the phone field has been blurred or a submit attempted.
    pub phone_touched: bool,
    /// Single-in-flight submission guard.
    pub loading: bool,
    /// Error surfaced by the last submit attempt; cleared when a new
    /// submit starts.
    pub error: Option<String>,
}

impl FormState {
    /// Keystroke into the email field.
    pub fn input_email(&mut self, value: &str) {
        self.email = value.to_owned();
    }

    /// Keystroke into the phone field; the display mask is re-applied.
    pub fn input_phone(&mut self, value: &str) {
        self.phone_display = phone::format_display(value);
    }

    /// Blur event on the email field.
    pub fn blur_email(&mut self) {
        self.email_touched = true;
    }

    /// Blur event on the phone field.
    pub fn blur_phone(&mut self) {
        self.phone_touched = true;
    }

    /// Digits derived from the masked phone input.
    #[must_use]
    pub fn phone_digits(&self) -> String {
        phone::normalize_digits(&self.phone_display)
    }

    /// Whether the email passes the coarse validity check.
    #[must_use]
    pub fn email_ok(&self) -> bool {
        Email::is_valid(&self.email)
    }

    /// Whether the phone digits form a valid Brazilian mobile number.
    #[must_use]
    pub fn phone_ok(&self) -> bool {
        phone::is_valid_br_mobile(&self.phone_digits())
    }

    /// Whether both fields pass validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.email_ok() && self.phone_ok()
    }

    /// Whether to show the inline email hint (touched and invalid).
    #[must_use]
    pub fn show_email_hint(&self) -> bool {
        self.email_touched && !self.email_ok()
    }

    /// Whether to show the inline phone hint (touched and invalid).
    #[must_use]
    pub fn show_phone_hint(&self) -> bool {
        self.phone_touched && !self.phone_ok()
    }

    /// Attempt to submit the form.
    ///
    /// Marks both fields touched (surfacing inline hints), then is a no-op
    /// while a submission is in flight or validation fails. Otherwise clears
    /// the previous error and runs the three-step sequence; success yields a
    /// redirect to [`CHECKOUT_URL`], failure stores the surfaced message.
    /// No automatic retry: the user resubmits manually.
    pub async fn submit(
        &mut self,
        session: &impl SessionApi,
        capture: &impl CaptureApi,
    ) -> SubmitResult {
        self.email_touched = true;
        self.phone_touched = true;

        if self.loading || !self.is_valid() {
            return SubmitResult::Stayed;
        }

        self.loading = true;
        self.error = None;

        let result = self.run_sequence(session, capture).await;
        self.loading = false;

        match result {
            Ok(()) => SubmitResult::Redirect(CHECKOUT_URL),
            Err(message) => {
                self.error = Some(message);
                SubmitResult::Stayed
            }
        }
    }

    /// The ordered submit sequence. Any step's failure aborts the rest.
    async fn run_sequence(
        &self,
        session: &impl SessionApi,
        capture: &impl CaptureApi,
    ) -> Result<(), String> {
        // Inputs were validated before the sequence started; parsing them
        // into the typed forms normalizes trim and mask in one place.
        let email = Email::parse(&self.email).map_err(|e| e.to_string())?;
        let phone = Phone::parse(&self.phone_display).map_err(|e| e.to_string())?;

        // 1) Fetch the order session. A missing id is tolerated; the
        //    capture and attach steps treat it as optional.
        let order_form_id = session
            .current_order_form()
            .await
            .map_err(|e| e.message().unwrap_or_else(|| GENERIC_FALLBACK.to_owned()))?;

        // 2) Submit the capture. The capture error's Display already probes
        //    the store payload and carries its own fixed fallback.
        capture
            .capture(&CaptureRequest {
                email: email.as_str().to_owned(),
                home_phone: phone.digits().to_owned(),
                order_form_id: order_form_id.clone(),
            })
            .await
            .map_err(|e| e.to_string())?;

        // 3) Attach the captured identity to the session, when there is one.
        if let Some(id) = order_form_id {
            session
                .attach_profile(&id, email.as_str(), phone.digits())
                .await
                .map_err(|e| e.message().unwrap_or_else(|| ATTACH_FALLBACK.to_owned()))?;
        }

        Ok(())
    }
}
