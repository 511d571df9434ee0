//! Capture workflow services.
//!
//! All of the repository's decision logic lives here: the idempotent upsert
//! against the document store ([`capture`]) and the form state machine that
//! orchestrates the session fetch, capture and attach calls ([`form`]).

pub mod capture;
pub mod form;

pub use capture::{CaptureApi, CaptureError, CaptureRequest, DocumentStore};
pub use form::{FormState, SessionApi, SubmitResult};
