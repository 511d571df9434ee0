//! Core types for the pre-checkout capture workflow.

pub mod customer;
pub mod email;
pub mod phone;

pub use customer::{CaptureAction, CaptureOutcome, CustomerRecord, DEFAULT_BIRTH_DATE};
pub use email::{Email, EmailError};
pub use phone::{Phone, PhoneError};
